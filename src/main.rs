use anyhow::Result;
use benefit_console::{app::App, config::Config, ui::Theme};
use clap::{crate_version, App as ClapApp, Arg};

fn main() -> Result<()> {
    let themes = Theme::available_themes();
    let theme_names: Vec<&str> = themes.iter().map(String::as_str).collect();
    let matches = ClapApp::new("benefit-console")
        .version(crate_version!())
        .about("Terminal administration console for benefit disbursement programs")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("theme")
                .short("t")
                .long("theme")
                .value_name("NAME")
                .help("Theme used for this session")
                .possible_values(&theme_names)
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(theme) = matches.value_of("theme") {
        config.theme_name = theme.to_string();
    }
    App::start(config)
}
