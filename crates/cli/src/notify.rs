use agendify_frontend_common::{Notice, NoticeLevel, Notifier};
use tracing::debug;

/// Prints notices for the person at the terminal
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        debug!(level = ?notice.level, message = %notice.message, "notice");
        match notice.level {
            NoticeLevel::Success => println!("✓ {notice}"),
            NoticeLevel::Info => println!("{notice}"),
            NoticeLevel::Error => eprintln!("✗ {notice}"),
        }
    }
}
