use clap::Parser;
use showroom_client::core::excerpt;
use showroom_client::utils::{
    logger,
    validation::{self, Validate},
};
use showroom_client::{
    BrowseEvent, BrowsePhase, CardView, CliConfig, ConfigProvider, ContactEvent, ContactField,
    ContactSink, ContactSubmitter, PostBrowser, PostListing, SiteApi, SubmitPhase, TomlConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("🚀 Starting showroom client");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Some(path) = cli.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path) {
            Ok(config) => run(cli, config).await,
            Err(e) => {
                tracing::error!("❌ Failed to load config file {}: {}", path, e);
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        }
    } else {
        let config = cli.clone();
        run(cli, config).await;
    }

    Ok(())
}

async fn run<C>(cli: CliConfig, config: C)
where
    C: ConfigProvider + Validate + 'static,
{
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if cli.dry_run {
        print_profile(&config);
        return;
    }

    let quiet = Duration::from_millis(config.search_quiet_ms());
    let fade = Duration::from_millis(config.success_fade_ms());
    let dismiss = Duration::from_millis(config.success_dismiss_ms());
    let api = Arc::new(SiteApi::new(config));

    if cli.message.is_some() {
        run_contact(&cli, api, fade, dismiss).await;
    } else {
        run_browse(&cli, api, quiet).await;
    }
}

fn print_profile<C: ConfigProvider>(config: &C) {
    println!("🔍 Dry Run Analysis");
    println!("===================");
    println!("📡 Endpoints:");
    println!("  Base URL: {}", config.api_base());
    println!("  Posts:    {}", config.posts_path());
    println!("  Contact:  {}", config.contact_path());
    match config.timeout_seconds() {
        Some(secs) => println!("  Timeout:  {}s", secs),
        None => println!("  Timeout:  (library default)"),
    }
    let headers = config.extra_headers().map_or(0, |h| h.len());
    println!("  Extra headers: {}", headers);
    println!("⏱ Flow timings:");
    println!("  Search quiet period: {} ms", config.search_quiet_ms());
    println!("  Success fade:        {} ms", config.success_fade_ms());
    println!("  Success dismiss:     {} ms", config.success_dismiss_ms());
}

async fn run_browse<G: PostListing + 'static>(cli: &CliConfig, gateway: Arc<G>, quiet: Duration) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut browser = PostBrowser::new(gateway, tx).with_quiet_period(quiet);
    browser.start();
    settle_browser(&mut browser, &mut rx).await;

    if !cli.search.is_empty() {
        tracing::info!("🔍 Searching for {:?}", cli.search);
        browser.handle(BrowseEvent::SearchInput(cli.search.clone()));
        settle_browser(&mut browser, &mut rx).await;
    }

    if cli.page > 1 {
        browser.handle(BrowseEvent::PageSelected(cli.page));
        settle_browser(&mut browser, &mut rx).await;
    }

    for id in &cli.expand {
        browser.handle(BrowseEvent::ToggleExpand(*id));
    }

    match browser.phase() {
        BrowsePhase::Error(message) => {
            eprintln!("❌ {}", message);
            std::process::exit(2);
        }
        _ => print_cards(&browser),
    }
}

/// 等事件迴圈靜下來：沒有進行中的請求、也沒有在數的安靜期
async fn settle_browser<G: PostListing + 'static>(
    browser: &mut PostBrowser<G>,
    events: &mut mpsc::UnboundedReceiver<BrowseEvent>,
) {
    while matches!(browser.phase(), BrowsePhase::Loading) || browser.has_pending_search() {
        match timeout(Duration::from_secs(30), events.recv()).await {
            Ok(Some(event)) => browser.handle(event),
            Ok(None) => break,
            Err(_) => {
                tracing::warn!("⏳ Timed out waiting for the site to respond");
                break;
            }
        }
    }
}

fn print_cards<G: PostListing + 'static>(browser: &PostBrowser<G>) {
    if browser.no_results() {
        println!("No posts found.");
        return;
    }

    println!("📄 Page {} of {}", browser.page(), browser.total_pages());
    for post in browser.posts() {
        println!();
        println!("## {}", post.title);
        if let Some(date) = post.created_date() {
            println!("🗓 {}", date);
        }
        match post.lead_image() {
            Some(url) => println!("🖼 {}", url),
            None => println!("🖼 No Image"),
        }
        match browser.card_view(post) {
            CardView::Collapsed { excerpt } => println!("{}", excerpt),
            CardView::Expanded {
                content_html,
                gallery,
            } => {
                println!("{}", excerpt::strip_html(content_html));
                if !gallery.is_empty() {
                    println!("🖼 Gallery: {} more image(s)", gallery.len());
                }
            }
        }
    }
}

async fn run_contact<G: ContactSink + 'static>(
    cli: &CliConfig,
    gateway: Arc<G>,
    fade: Duration,
    dismiss: Duration,
) {
    for (flag, value) in [
        ("name", &cli.name),
        ("email", &cli.email),
        ("message", &cli.message),
    ] {
        if let Err(e) = validation::validate_required_field(flag, value) {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: pass --{}", flag);
            std::process::exit(1);
        }
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut submitter = ContactSubmitter::new(gateway, tx).with_success_timing(fade, dismiss);

    let fields = [
        (ContactField::Name, &cli.name),
        (ContactField::Email, &cli.email),
        (ContactField::Phone, &cli.phone),
        (ContactField::Service, &cli.service),
        (ContactField::Message, &cli.message),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            submitter.handle(ContactEvent::FieldEdited(field, value.clone()));
        }
    }

    tracing::info!("📨 Sending the contact form");
    submitter.handle(ContactEvent::SubmitRequested);

    loop {
        match timeout(Duration::from_secs(30), rx.recv()).await {
            Ok(Some(event)) => submitter.handle(event),
            Ok(None) | Err(_) => {
                eprintln!("❌ Timed out waiting for the submission result");
                std::process::exit(2);
            }
        }
        match submitter.phase() {
            SubmitPhase::Success { .. } => {
                println!("✅ Message sent successfully!");
                if let Some(message) = submitter.receipt().and_then(|r| r.message.as_deref()) {
                    println!("💬 {}", message);
                }
                break;
            }
            SubmitPhase::Idle => {
                if let Some(error) = submitter.error() {
                    eprintln!("❌ {}", error);
                    std::process::exit(2);
                }
            }
            SubmitPhase::Submitting => {}
        }
    }
}
