// Stylesheet export in a separate thread

use anyhow::{Context, Result, bail};
use backendcfg::cursor::BrowserProfile;
use backendcfg::cursor::sheet::{build_stylesheet, load_cursor_sources, write_stylesheet};
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use std::thread;

use crate::event::AppMsg;

pub struct ExportWorker {
    tx: Sender<AppMsg>,
}

impl ExportWorker {
    pub fn new(tx: Sender<AppMsg>) -> Self {
        Self { tx }
    }

    pub fn start_export(&self, input_dir: PathBuf, output_path: PathBuf, profile: BrowserProfile) {
        let tx = self.tx.clone();

        thread::spawn(move || {
            if let Err(e) = Self::run_export(&input_dir, &output_path, profile, &tx) {
                let _ = tx.send(AppMsg::ExportFailed(format!("{:#}", e)));
            }
        });
    }

    fn run_export(
        input_dir: &Path,
        output_path: &Path,
        profile: BrowserProfile,
        tx: &Sender<AppMsg>,
    ) -> Result<()> {
        let sources = load_cursor_sources(input_dir)
            .with_context(|| format!("Failed to scan {}", input_dir.display()))?;

        if sources.is_empty() {
            bail!("No cursor folders with a .conf file in {}", input_dir.display());
        }

        let _ = tx.send(AppMsg::LogMessage(format!(
            "Found {} cursors, encoding...",
            sources.len()
        )));

        let sheet = build_stylesheet(&sources, profile);
        for (name, reason) in &sheet.skipped {
            let _ = tx.send(AppMsg::LogMessage(format!("  ✗ {}: {}", name, reason)));
        }

        write_stylesheet(output_path, &sheet)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        let _ = tx.send(AppMsg::ExportCompleted {
            path: output_path.to_path_buf(),
            exported: sheet.exported,
            skipped: sheet.skipped.len(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use image::{Rgba, RgbaImage};
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_export_reports_completion() {
        let dir = tempdir().unwrap();
        let cursor_dir = dir.path().join("wait");
        std::fs::create_dir_all(&cursor_dir).unwrap();
        RgbaImage::from_pixel(32, 32, Rgba([0, 0, 0, 255]))
            .save(cursor_dir.join("wait_000.png"))
            .unwrap();
        std::fs::write(cursor_dir.join("wait.conf"), "32\t16\t16\twait_000.png\t50\n").unwrap();

        let (tx, rx) = unbounded();
        let out = dir.path().join("cursors.css");
        ExportWorker::new(tx).start_export(dir.path().to_path_buf(), out.clone(), BrowserProfile::WEBKIT);

        loop {
            match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
                AppMsg::ExportCompleted { path, exported, skipped } => {
                    assert_eq!(path, out);
                    assert_eq!((exported, skipped), (1, 0));
                    break;
                }
                AppMsg::ExportFailed(e) => panic!("export failed: {}", e),
                _ => {}
            }
        }
        assert!(std::fs::read_to_string(&out).unwrap().contains("-webkit-image-set("));
    }

    #[test]
    fn test_export_without_cursors_fails() {
        let dir = tempdir().unwrap();
        let (tx, rx) = unbounded();
        ExportWorker::new(tx).start_export(
            dir.path().to_path_buf(),
            dir.path().join("cursors.css"),
            BrowserProfile::STANDARD,
        );

        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            AppMsg::ExportFailed(e) => assert!(e.contains("No cursor folders")),
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
