mod config;
mod controller;
mod page;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::ControllerConfig;
use controller::timer::TimerEvent;
use controller::{Controller, SubmitPhase, SUBMIT_DELAY};
use page::memory::MemoryPage;
use page::{ClickEvent, Page};

#[derive(Parser, Debug)]
#[command(name = "pagewire")]
#[command(version = "0.1.0")]
#[command(about = "Drives the page-interaction controller against a demo page")]
struct Args {
    /// Path to a controller config file (element bindings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario to run against the demo page
    #[arg(short, long, value_enum, default_value_t = Scenario::Load)]
    scenario: Scenario,

    /// Print the final page state as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Don't sit through the full submit delay; report the timer as pending
    #[arg(long)]
    fast: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scenario {
    /// Reload a page reached via form POST; the sanitized entry re-GETs
    Reload,
    /// Click the back link; history pops instead of a server round-trip
    Back,
    /// Click the load button; spinner shows, form submits after the delay
    Load,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ControllerConfig::load_from(path)?,
        None => ControllerConfig::load(),
    };

    let mut page = demo_page(&config);
    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
    let mut controller = Controller::attach(config.clone(), &mut page, timer_tx);
    controller.handle_content_loaded(&page);

    match args.scenario {
        Scenario::Reload => {
            // attach already replaced the POST entry; nothing else to do
            tracing::info!(
                "History sanitized: {} entries, reached_via_post = {}",
                page.history_len(),
                page.history.reached_via_post
            );
        }
        Scenario::Back => {
            let back = page
                .query_selector(&config.back_link_selector)
                .ok_or_else(|| anyhow::anyhow!("Demo page has no back link"))?;
            let mut click = ClickEvent::new(back);
            controller.handle_click(&mut page, &mut click)?;
        }
        Scenario::Load => {
            let button = page
                .element_by_id(&config.load_button_id)
                .ok_or_else(|| anyhow::anyhow!("Demo page has no load button"))?;
            let mut click = ClickEvent::new(button);
            controller.handle_click(&mut page, &mut click)?;

            if args.fast {
                tracing::info!("Skipping the {:?} wait (--fast)", SUBMIT_DELAY);
                controller.teardown();
            } else {
                wait_for_submit(&mut controller, &mut page, &mut timer_rx).await?;
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_summary(&controller, &page, &config);
    }

    Ok(())
}

/// Block on the submit timer, then run the fire transition
async fn wait_for_submit(
    controller: &mut Controller,
    page: &mut MemoryPage,
    timer_rx: &mut mpsc::UnboundedReceiver<TimerEvent>,
) -> Result<()> {
    tracing::info!("Waiting {:?} for the spinner to earn its keep", SUBMIT_DELAY);

    // Grace period on top of the delay so a wedged timer can't hang the demo
    let fired = tokio::time::timeout(SUBMIT_DELAY + Duration::from_secs(1), timer_rx.recv()).await;

    match fired {
        Ok(Some(_)) => {
            controller.handle_submit_delay_elapsed(page)?;
            Ok(())
        }
        Ok(None) => anyhow::bail!("Timer channel closed before firing"),
        Err(_) => anyhow::bail!("Submit timer never fired"),
    }
}

/// Build the markup the controller expects: back link, load button,
/// hidden spinner, and the target form
fn demo_page(config: &ControllerConfig) -> MemoryPage {
    let mut page = MemoryPage::new("https://example.test/movements/new").reached_via_post(3);

    if let Some(class) = config.back_link_selector.strip_prefix('.') {
        page.add_link(class, "/movements");
    } else if let Some(id) = config.back_link_selector.strip_prefix('#') {
        page.add_link_by_id(id, "/movements");
    }
    page.add_button(&config.load_button_id);
    page.add_hidden(&config.spinner_id);
    page.add_form(&config.form_id);
    page
}

fn print_summary(controller: &Controller, page: &MemoryPage, config: &ControllerConfig) {
    println!("history entries:   {}", page.history_len());
    println!("replace calls:     {}", page.history.replace_calls);
    println!("back calls:        {}", page.history.back_calls);
    println!("reached via POST:  {}", page.history.reached_via_post);

    if let Some(spinner) = page.element_by_id(&config.spinner_id) {
        let hidden = page.element(spinner).map(|el| el.hidden).unwrap_or(true);
        println!("spinner visible:   {}", !hidden);
    }
    if let Some(form) = page.element_by_id(&config.form_id) {
        let submits = page.element(form).map(|el| el.submit_count).unwrap_or(0);
        println!("form submissions:  {}", submits);
    }

    let phase = match controller.phase() {
        SubmitPhase::Idle => "idle",
        SubmitPhase::Triggered => "triggered (timer pending)",
        SubmitPhase::Submitted => "submitted",
    };
    println!("submit phase:      {}", phase);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_page_matches_class_back_link_selector() {
        let config = ControllerConfig::default();
        let page = demo_page(&config);
        assert!(page.query_selector(&config.back_link_selector).is_some());
    }

    #[test]
    fn test_demo_page_matches_id_back_link_selector() {
        let config = ControllerConfig {
            back_link_selector: "#go-back".to_string(),
            ..ControllerConfig::default()
        };
        let page = demo_page(&config);
        assert!(page.query_selector("#go-back").is_some());
    }
}
