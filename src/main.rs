use iced::Task;
use tracing::info;
use usb_print_transfer::utils::logging;

mod style;
mod ui;

use ui::application::UsbPrintTransfer;

pub fn main() -> anyhow::Result<()> {
    let log_dir = logging::default_log_dir()?;
    let _log_guard = logging::init(&log_dir)?;
    info!("Errors are logged to {}", log_dir.join(logging::ERROR_LOG_FILE).display());

    // Device detection failing here is fatal, before any window is shown
    let app = UsbPrintTransfer::new()?;

    iced::application(
        UsbPrintTransfer::title,
        UsbPrintTransfer::update,
        UsbPrintTransfer::view,
    )
    .theme(|_| style::custom_theme())
    .window_size(iced::Size::new(560f32, 520f32))
    .resizable(false)
    .centered()
    .run_with(move || (app, Task::none()))?;

    Ok(())
}
