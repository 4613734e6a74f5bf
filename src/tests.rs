// Integration tests across config, prefs and cursor modules

#[cfg(test)]
mod tests {
    use crate::config::{ApplicationConfig, ConfigFile, HeadlessConfig};
    use crate::cursor::sheet::{build_stylesheet, load_cursor_sources, write_stylesheet};
    use crate::cursor::{BrowserCursor, BrowserProfile, Cursor, PixelFormat, Pixmap};
    use crate::error::CursorError;
    use crate::platform::{MapEnvironment, OperatingSystem};
    use crate::prefs::FileType;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_each_os_branch_follows_convention() {
        let env = MapEnvironment::new()
            .with("APPDATA", "C:/Users/u/AppData/Roaming")
            .with("XDG_CONFIG_HOME", "/home/u/.xdg")
            .with("HOME", "/home/u");

        let cases = [
            (OperatingSystem::Windows, "C:/Users/u/AppData/Roaming", FileType::Absolute),
            (OperatingSystem::Mac, "Library/Preferences", FileType::External),
            (OperatingSystem::Linux, "/home/u/.xdg", FileType::Absolute),
            (OperatingSystem::Unknown, ".prefs/", FileType::External),
        ];
        for (os, dir, file_type) in cases {
            let app = ApplicationConfig::with_environment(os, &env);
            let headless = HeadlessConfig::with_environment(os, &env);
            assert_eq!(app.preferences.directory, dir, "{}", os);
            assert_eq!(app.preferences.file_type, file_type, "{}", os);
            assert_eq!(headless.preferences, app.preferences, "{}", os);
        }

        let empty = MapEnvironment::new();
        let fallbacks = [
            (OperatingSystem::Windows, ".prefs/"),
            (OperatingSystem::Mac, "Library/Preferences"),
            (OperatingSystem::Linux, ".config"),
        ];
        for (os, dir) in fallbacks {
            let app = ApplicationConfig::with_environment(os, &empty);
            assert_eq!(app.preferences.directory, dir, "{}", os);
            assert_eq!(app.preferences.file_type, FileType::External, "{}", os);
        }
    }

    #[test]
    fn test_saved_config_keeps_resolved_preferences() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let env = MapEnvironment::new()
            .with("XDG_CONFIG_HOME", "$HOME/.config")
            .with("HOME", "/home/u");

        let config = ApplicationConfig::with_environment(OperatingSystem::Linux, &env);
        config.save_to_file(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("/home/u/.config"));
        assert_eq!(ApplicationConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_png_on_disk_to_cursor() {
        let dir = tempdir().unwrap();
        let rgb_path = dir.path().join("rgb.png");
        image::RgbImage::new(8, 8).save(&rgb_path).unwrap();

        let pixmap = Pixmap::open(&rgb_path).unwrap();
        assert_eq!(pixmap.format(), PixelFormat::Rgb888);
        assert!(matches!(
            BrowserCursor::from_pixmap(&pixmap, 0, 0, BrowserProfile::STANDARD),
            Err(CursorError::InvalidFormat { .. })
        ));

        let mut cursor =
            BrowserCursor::from_pixmap(&pixmap.to_rgba8888(), 7, 7, BrowserProfile::LEGACY).unwrap();
        assert!(cursor.css_property().ends_with(" 7 7, auto"));
        cursor.dispose();
        cursor.dispose();
    }

    fn write_cursor_folder(root: &Path, name: &str, size: u32, hotspot: (u32, u32)) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255]))
            .save(dir.join(format!("{}_000.png", name)))
            .unwrap();
        fs::write(
            dir.join(format!("{}.conf", name)),
            format!("{}\t{}\t{}\t{}_000.png\t50\n", size, hotspot.0, hotspot.1, name),
        )
        .unwrap();
    }

    #[test]
    fn test_cursor_folder_to_stylesheet() {
        let dir = tempdir().unwrap();
        write_cursor_folder(dir.path(), "pointer", 32, (8, 2));
        write_cursor_folder(dir.path(), "text", 24, (12, 12));

        let sources = load_cursor_sources(dir.path()).unwrap();
        let sheet = build_stylesheet(&sources, BrowserProfile::LEGACY);
        assert_eq!(sheet.exported, 2);
        assert!(sheet.skipped.is_empty());

        let out = dir.path().join("css").join("cursors.css");
        write_stylesheet(&out, &sheet).unwrap();

        let css = fs::read_to_string(&out).unwrap();
        let pointer = css.find(".cursor-pointer").unwrap();
        let text = css.find(".cursor-text").unwrap();
        assert!(pointer < text);
        assert!(css.contains("') 8 2, auto;"));
        assert!(css.contains("') 12 12, auto;"));
    }
}
