//! Console notifier backend: prints every scheduling call instead of
//! touching an OS surface. Doubles as the dry-run delivery channel.

use async_trait::async_trait;

use larder_core::content::NotificationCategory;
use larder_notify::{ActionDef, NotificationRequest, Notifier, NotifyError, Trigger};

#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    scheduled: usize,
}

fn trigger_label(trigger: &Trigger) -> String {
    match trigger {
        Trigger::Immediate => "now".to_string(),
        Trigger::At(instant) => instant.to_rfc3339(),
        Trigger::AfterSeconds(secs) => format!("+{}h{:02}m", secs / 3600, (secs % 3600) / 60),
        Trigger::Daily { hour, minute } => format!("daily {hour:02}:{minute:02}"),
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn request_permission(&mut self) -> Result<bool, NotifyError> {
        Ok(true)
    }

    async fn register_category(
        &mut self,
        _category: NotificationCategory,
        _actions: Vec<ActionDef>,
    ) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotifyError> {
        self.scheduled += 1;
        println!(
            "{:>2}. [{}] {}\n    {}",
            self.scheduled,
            trigger_label(&request.trigger),
            request.content.title,
            request.content.body
        );
        Ok(())
    }

    async fn cancel_all(&mut self) -> Result<(), NotifyError> {
        if self.scheduled > 0 {
            println!("(cleared {} previously scheduled)", self.scheduled);
        }
        self.scheduled = 0;
        Ok(())
    }
}
