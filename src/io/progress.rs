//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Processing step a file has reached
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileStage {
    /// Waiting to start
    #[default]
    Pending,
    /// Reading the source files
    Load,
    /// Removing blank and redundant tiles
    Cleanup,
    /// Writing output files
    Write,
    /// All outputs written
    Done,
}

impl FileStage {
    /// Number of steps a file goes through
    pub const STEPS: u64 = 4;

    /// Completed steps when this stage is reached
    pub const fn position(self) -> u64 {
        match self {
            Self::Pending => 0,
            Self::Load => 1,
            Self::Cleanup => 2,
            Self::Write => 3,
            Self::Done => 4,
        }
    }

    /// Short label shown next to the bar
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Load => "load",
            Self::Cleanup => "cleanup",
            Self::Write => "write",
            Self::Done => "done",
        }
    }
}

/// Coordinates progress display for batch operations
///
/// Shows one bar per file for the most recent files, plus a single batch bar
/// when the set is too large to show every file.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    /// Stores (`filename`, `stage`) for rolling window display
    file_states: Vec<(String, FileStage)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg:>8} [{bar:20.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_states: Vec::new(),
        }
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(FileStage::STEPS);
            pb.set_style(STAGE_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Register a file that is about to be processed
    pub fn start_file(&mut self, index: usize, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states
                .resize(index + 1, (String::new(), FileStage::Pending));
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = (display_name, FileStage::Pending);
        }
        self.update_bars();
    }

    /// Report the stage a file has reached
    pub fn update_stage(&mut self, index: usize, stage: FileStage) {
        if let Some(state) = self.file_states.get_mut(index) {
            state.1 = stage;
        }
        self.update_bars();
    }

    /// Mark file as completed and update batch progress
    pub fn complete_file(&mut self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.file_states.get_mut(index) {
            state.0 = format!("✓ {}", state.0);
            state.1 = FileStage::Done;
        }
        self.update_bars();
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Number of files registered so far
    pub fn tracked_files(&self) -> usize {
        self.file_states.iter().filter(|(name, _)| !name.is_empty()).count()
    }

    /// Stage recorded for file `index`
    pub fn stage(&self, index: usize) -> Option<FileStage> {
        self.file_states.get(index).map(|(_, stage)| *stage)
    }

    /// Update all progress bars to show the last N active files
    fn update_bars(&self) {
        let active_files: Vec<&(String, FileStage)> = self
            .file_states
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let start_idx = active_files
            .len()
            .saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible_files = active_files.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, (name, stage)) in visible_files.iter().enumerate() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_length(FileStage::STEPS);
                bar.set_position(stage.position());
                bar.set_message(stage.label());
                bar.set_prefix(name.clone());
            }
        }

        // Clear any unused bars
        for bar_idx in visible_files.len()..self.file_bars.len() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_length(0);
                bar.set_position(0);
                bar.set_message("");
                bar.set_prefix(String::new());
            }
        }
    }
}
