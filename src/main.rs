#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = preview::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod preview {
    use std::any::Any;
    use std::env;
    use std::fmt;
    use std::fs;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;

    use anyhow::{anyhow, Context, Result};
    use winit::event_loop::{ControlFlow, EventLoop};

    use couture_backdrop::{
        run_headless, BackdropConfig, FilePreferences, MemoryPreferences, PreferenceStore,
        PreviewApp, Theme, ThemeState, ThemeToggle,
    };

    const DEFAULT_FRAMES: u64 = 120;
    const WINDOW_SIZE: (u32, u32) = (1280, 720);

    pub fn run() -> Result<()> {
        let options = CliOptions::parse()?;
        let config = match options.config_path.as_deref() {
            Some(path) => {
                let source = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {path}"))?;
                BackdropConfig::from_toml(&source)
                    .with_context(|| format!("failed to parse config {path}"))?
            }
            None => BackdropConfig::default(),
        };
        let store: Arc<dyn PreferenceStore> = match options.prefs_path.as_deref() {
            Some(path) => Arc::new(
                FilePreferences::open(path)
                    .with_context(|| format!("failed to open preferences {path}"))?,
            ),
            None => Arc::new(MemoryPreferences::new()),
        };

        let toggle = ThemeToggle::new(ThemeState::default(), store);
        toggle.restore();
        if let Some(theme) = options.theme {
            toggle.state().set(theme);
        }
        let theme = toggle.state().clone();

        if options.headless {
            return print_headless(config, theme, options.frames);
        }

        match run_interactive(config.clone(), toggle) {
            Ok(()) => Ok(()),
            Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
                eprintln!("{err}. Falling back to --headless mode.");
                print_headless(config, theme, options.frames)
            }
            Err(err) => Err(err),
        }
    }

    fn print_headless(config: BackdropConfig, theme: ThemeState, frames: u64) -> Result<()> {
        let summary =
            run_headless(config, theme, frames, WINDOW_SIZE).context("headless run failed")?;
        println!("{summary}");
        Ok(())
    }

    fn run_interactive(
        config: BackdropConfig,
        toggle: ThemeToggle<Arc<dyn PreferenceStore>>,
    ) -> Result<()> {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
        panic::set_hook(default_hook);
        let event_loop = event_loop
            .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
            .map_err(|err| WindowInitError::from_error("event loop", err))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = PreviewApp::new(config, toggle, WINDOW_SIZE);
        event_loop
            .run_app(&mut app)
            .context("event loop terminated with error")?;

        if let Some(err) = app.take_unavailable() {
            return Err(WindowInitError::from_error("renderer", err).into());
        }
        if let Some(err) = app.take_error() {
            return Err(anyhow!(err));
        }
        if let Some(summary) = app.summary() {
            println!("{summary}");
        }
        Ok(())
    }

    #[derive(Debug)]
    struct WindowInitError {
        message: String,
    }

    impl WindowInitError {
        fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
            Self {
                message: format!("failed to initialize {stage}: {}", panic_message(panic)),
            }
        }

        fn from_error(stage: &str, err: impl fmt::Display) -> Self {
            Self {
                message: format!("failed to initialize {stage}: {err}"),
            }
        }
    }

    impl fmt::Display for WindowInitError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.message)
        }
    }

    impl std::error::Error for WindowInitError {}

    fn panic_message(panic: Box<dyn Any + Send>) -> String {
        match panic.downcast::<String>() {
            Ok(msg) => *msg,
            Err(panic) => match panic.downcast::<&'static str>() {
                Ok(msg) => (*msg).to_string(),
                Err(_) => "unknown panic".into(),
            },
        }
    }

    struct CliOptions {
        headless: bool,
        frames: u64,
        theme: Option<Theme>,
        config_path: Option<String>,
        prefs_path: Option<String>,
    }

    const USAGE: &str = "Usage: couture-backdrop [--headless] [--frames N] [--theme day|night] [--config PATH] [--prefs PATH]";

    impl CliOptions {
        fn parse() -> Result<Self> {
            Self::parse_from(env::args().skip(1))
        }

        fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Self> {
            let mut options = Self {
                headless: false,
                frames: DEFAULT_FRAMES,
                theme: None,
                config_path: None,
                prefs_path: None,
            };
            let mut args = args.into_iter();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--headless" => options.headless = true,
                    "--frames" => {
                        let value = next_value(&mut args, "--frames")?;
                        options.frames = value
                            .parse()
                            .with_context(|| format!("invalid frame count: {value}"))?;
                    }
                    "--theme" => {
                        options.theme = Some(match next_value(&mut args, "--theme")?.as_str() {
                            "day" => Theme::Day,
                            "night" => Theme::Night,
                            other => {
                                return Err(anyhow!(
                                    "Unknown theme: {other}. Expected day or night"
                                ))
                            }
                        });
                    }
                    "--config" => options.config_path = Some(next_value(&mut args, "--config")?),
                    "--prefs" => options.prefs_path = Some(next_value(&mut args, "--prefs")?),
                    other => return Err(anyhow!("Unknown argument: {other}. {USAGE}")),
                }
            }
            Ok(options)
        }
    }

    fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
        args.next()
            .ok_or_else(|| anyhow!("{flag} expects a value. {USAGE}"))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> Result<CliOptions> {
            CliOptions::parse_from(args.iter().map(|arg| arg.to_string()))
        }

        #[test]
        fn defaults_to_interactive_night_preview() {
            let options = parse(&[]).unwrap();
            assert!(!options.headless);
            assert_eq!(options.frames, DEFAULT_FRAMES);
            assert_eq!(options.theme, None);
        }

        #[test]
        fn parses_all_flags() {
            let options = parse(&[
                "--headless",
                "--frames",
                "30",
                "--theme",
                "day",
                "--config",
                "backdrop.toml",
                "--prefs",
                "prefs.toml",
            ])
            .unwrap();
            assert!(options.headless);
            assert_eq!(options.frames, 30);
            assert_eq!(options.theme, Some(Theme::Day));
            assert_eq!(options.config_path.as_deref(), Some("backdrop.toml"));
            assert_eq!(options.prefs_path.as_deref(), Some("prefs.toml"));
        }

        #[test]
        fn rejects_unknown_input() {
            assert!(parse(&["--theme", "sepia"]).is_err());
            assert!(parse(&["--frames"]).is_err());
            assert!(parse(&["--fast"]).is_err());
        }
    }
}
