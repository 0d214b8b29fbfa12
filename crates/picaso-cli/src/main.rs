//! PICASO Display Control Tool
//!
//! CLI for bringing up and exercising a PICASO serial display module.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, UiConfig};
use picaso_hw::colour::{self, Colour};
use picaso_hw::{Display, NativeChannel, ScreenMode};
use picaso_ui::{ButtonConfig, CanvasConfig, Widget};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "picasoctl")]
#[command(about = "Control tool for PICASO serial display modules")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file
    #[arg(long, default_value = "picaso.toml")]
    config: String,

    /// Serial port (overrides the configuration file)
    #[arg(long, env = "PICASO_SERIAL_PORT")]
    port: Option<String>,

    /// Baud rate the module is running at (overrides the configuration file)
    #[arg(long, env = "PICASO_SERIAL_BAUDRATE")]
    baud: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the rate the module is running at
    Detect,
    /// Detect the current rate, then switch the module to a new one
    SetBaud {
        /// Target rate (default: serial.target_baud_rate)
        rate: Option<u32>,
    },
    /// Show the display model
    Model,
    /// Reset the link by sending zero bytes and draining the input
    Reset,
    /// Clear the display to a solid colour
    Clear {
        /// Colour name or hex (e.g., #FF0000 for red)
        #[arg(long, default_value = "black")]
        colour: String,
    },
    /// Set the screen mode
    Mode {
        /// Mode: landscape, landscape-reverse, portrait, portrait-reverse
        mode: String,
    },
    /// Draw a screen of buttons
    Demo {
        /// Button labels
        #[arg(default_values = ["One", "Two", "Three"])]
        labels: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(port) = cli.port {
        config.serial.port = port;
    }
    if let Some(baud) = cli.baud {
        config.serial.baud_rate = baud;
    }

    let mut display = connect(&config)?;

    match cli.command {
        Commands::Detect => handle_detect(&mut display),
        Commands::SetBaud { rate } => {
            handle_set_baud(&mut display, rate.unwrap_or(config.serial.target_baud_rate))
        }
        Commands::Model => handle_model(&mut display),
        Commands::Reset => {
            display.reset()?;
            println!("Link reset");
            Ok(())
        }
        Commands::Clear { colour } => handle_clear(&mut display, &colour),
        Commands::Mode { mode } => handle_mode(&mut display, &mode),
        Commands::Demo { labels } => handle_demo(&mut display, &config.ui, &labels),
    }
}

fn connect(config: &Config) -> Result<Display<NativeChannel>> {
    let serial = &config.serial;
    let mut display = Display::connect(&serial.port, serial.baud_rate)
        .with_context(|| format!("Failed to open {}", serial.port))?
        .with_probe_timeout(serial.probe_timeout());
    display.link_mut().set_timeout(serial.read_timeout());
    info!("Connected to {} at {} baud", serial.port, serial.baud_rate);
    Ok(display)
}

fn handle_detect(display: &mut Display<NativeChannel>) -> Result<()> {
    let rate = display
        .detect_baud_rate()
        .context("Device doesn't seem to be responding")?;
    println!("Device running at {} baud", rate);
    Ok(())
}

fn handle_set_baud(display: &mut Display<NativeChannel>, target: u32) -> Result<()> {
    let rate = display
        .detect_baud_rate()
        .context("Device doesn't seem to be responding. Try running detection again.")?;
    println!("Device running at {} baud", rate);

    if rate != target {
        println!("Switching to {} baud", target);
        display
            .set_baud_rate(target)
            .context("Device doesn't seem to be responding. Try running detection again.")?;
        println!("Device running at {} baud", target);
    }
    println!("export PICASO_SERIAL_BAUDRATE={}", target);
    Ok(())
}

fn handle_model(display: &mut Display<NativeChannel>) -> Result<()> {
    let model = display.model()?;
    println!("Model: {}", String::from_utf8_lossy(&model));
    Ok(())
}

fn handle_clear(display: &mut Display<NativeChannel>, colour: &str) -> Result<()> {
    let value = parse_colour(colour)?;
    display.background_colour(value)?;
    display.cls()?;
    println!("Display cleared to: {}", colour);
    Ok(())
}

fn handle_mode(display: &mut Display<NativeChannel>, mode: &str) -> Result<()> {
    let mode: ScreenMode = mode.parse()?;
    let previous = display.screen_mode(mode)?;
    println!("Screen mode set to: {} (was {})", mode, previous);
    Ok(())
}

fn handle_demo(
    display: &mut Display<NativeChannel>,
    ui: &UiConfig,
    labels: &[String],
) -> Result<()> {
    let mut root = demo_screen(display.dimensions(), ui, labels)?;
    root.draw(display)?;
    println!("Drew {} buttons", labels.len());
    Ok(())
}

/// Builds a full-screen canvas holding a column of buttons.
fn demo_screen(dimensions: (u16, u16), ui: &UiConfig, labels: &[String]) -> Result<Widget> {
    let background = parse_colour(&ui.background)?;
    let face = parse_colour(&ui.button_background)?;
    let label = parse_colour(&ui.button_foreground)?;

    let mut root = Widget::screen(dimensions, CanvasConfig::default().background(background));
    let column = root.add_child(Widget::y_grid())?;
    for text in labels {
        let button = ButtonConfig::new(text.as_str())
            .background(face)
            .foreground(label)
            .char_size(ui.button_char_width, ui.button_char_height);
        column.add_child(Widget::button(button))?;
    }
    Ok(root)
}

fn parse_colour(value: &str) -> Result<Colour> {
    colour::parse_colour(value).with_context(|| {
        format!(
            "Invalid colour: {}. Use a name (black, white, red, green, blue) or #RRGGBB",
            value
        )
    })
}
