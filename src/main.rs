use anyhow::{Context, Result};
use message_records::config::Config;
use message_records::{
    message_record, Arg, MessageFactory, MessageFn, MessageParam, ParamFormatter, Text,
};
use tracing::{info, warn};

/// A user handle rendered as `@name` inside messages.
struct Handle(String);

impl ParamFormatter for Handle {
    fn format_param(&self) -> String {
        format!("@{}", self.0)
    }
}

impl MessageParam for Handle {
    fn to_arg(&self) -> Arg {
        Arg::Str(self.0.clone())
    }

    fn as_param_formatter(&self) -> Option<&dyn ParamFormatter> {
        Some(self)
    }
}

message_record! {
    struct Common {
        #[text("Goodbye")]
        goodbye: Text,
    }
}

message_record! {
    struct Greeter {
        #[text("Welcome")]
        title: Text,
        #[message("Hello, %v!")]
        hello: MessageFn<(String,)>,
        #[message("%v, you have %d new messages")]
        inbox: MessageFn<(Handle, u32)>,
        #[embed]
        common: Common,
    }
}

fn preview(greeter: &Greeter) {
    println!("  title:   {}", greeter.title);
    println!("  hello:   {}", greeter.hello.call(("Sam",)));
    println!("  inbox:   {}", greeter.inbox.call((Handle("sam".to_string()), 3)));
    println!("  goodbye: {}", greeter.common.goodbye);
}

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("message_records=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let mut factory = MessageFactory::new();
    if config.locales_dir.is_dir() {
        factory
            .register_locale_dir(&config.locales_dir, &config.locale_format)
            .with_context(|| format!("Failed to register locales from {}", config.locales_dir.display()))?;
    } else {
        warn!("Locale directory {} not found", config.locales_dir.display());
    }

    let mut locales: Vec<String> = factory.locales().iter().map(ToString::to_string).collect();
    locales.sort();
    info!("Available locales: {}", locales.join(", "));

    let greeter: Greeter = factory.create()?;

    println!("Default messages:");
    preview(&greeter);

    if let Some(locale) = &config.locale {
        factory.load_locale(locale)?;

        println!("Messages for {}:", locale);
        preview(&greeter);

        let report = factory.validate();
        println!("Validation: {}", serde_json::to_string_pretty(&report)?);
    }

    println!("Metrics: {}", serde_json::to_string_pretty(&factory.metrics().report())?);
    Ok(())
}
