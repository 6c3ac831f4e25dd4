use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Progress tracking for the scan and retrieval phases
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start_scan(bucket: &str) -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        let pb = create_spinner(
            bright_yellow(format!("Phase 1/2: Scanning {bucket} for NEAT configs")).to_string(),
        );
        Self { pb }
    }

    pub fn finish_scan(self, found: usize) {
        self.pb.finish_with_message(
            bright_green(format!("Phase 1/2: Scan complete, {found} NEAT configs found ✓"))
                .to_string(),
        );
        eprintln!();
    }

    pub fn start_fetch(eligible: usize) -> Self {
        let pb = create_spinner(
            bright_yellow(format!("Phase 2/2: Retrieving {eligible} eligible configs")).to_string(),
        );
        Self { pb }
    }

    pub fn finish_fetch(self) {
        self.pb
            .finish_with_message(bright_green("Phase 2/2: Retrieval complete ✓").to_string());
        eprintln!("\n");
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
