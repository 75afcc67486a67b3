use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notifyseat::api::{HttpRoutineFeed, HttpSeatApi, MissingRoutineFeed, RoutineFeed};
use notifyseat::config::ClientConfig;
use notifyseat::models::Navigation;
use notifyseat::notify::{Confirm, TerminalNotifier};
use notifyseat::render;
use notifyseat::services::{HomeController, LoginFlow, LoginStep, Tab};
use notifyseat::state::AppState;
use notifyseat::storage::FileTokenStore;

type Input = Arc<Mutex<Lines<BufReader<Stdin>>>>;

struct StdinConfirm {
    input: Input,
}

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, title: &str, text: &str) -> bool {
        println!("{} {} [y/N]", title, text);
        let mut input = self.input.lock().await;
        matches!(
            input.next_line().await,
            Ok(Some(line)) if matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
        )
    }
}

async fn read_line(input: &Input, prompt: &str) -> Option<String> {
    println!("{}", prompt);
    let mut input = input.lock().await;
    input.next_line().await.ok().flatten()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "notifyseat=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let config = ClientConfig::new_from_env()?;

    let routine: Arc<dyn RoutineFeed> = match &config.routine_url {
        Some(url) => Arc::new(HttpRoutineFeed::new(url.clone(), config.request_timeout)?),
        None => Arc::new(MissingRoutineFeed),
    };
    let input: Input = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));

    let state = AppState {
        api: Arc::new(HttpSeatApi::new(config.api_base.clone(), config.request_timeout)?),
        routine,
        tokens: Arc::new(FileTokenStore::new(config.token_path())),
        notifier: Arc::new(TerminalNotifier),
        confirm: Arc::new(StdinConfirm { input: input.clone() }),
        config,
    };
    info!("Using API at {}", state.config.api_base);

    let mut page = Navigation::Home;
    loop {
        page = match page {
            Navigation::Login => match run_login(&state, &input).await? {
                Some(next) => next,
                None => break,
            },
            Navigation::Home => match HomeController::load(state.clone()).await {
                Ok(home) => match run_home(home, &input).await? {
                    Some(next) => next,
                    None => break,
                },
                Err(e) if e.requires_login() => Navigation::Login,
                Err(e) => {
                    warn!("Could not open home page: {}", e);
                    Navigation::Login
                }
            },
        };
    }

    Ok(())
}

async fn run_login(state: &AppState, input: &Input) -> Result<Option<Navigation>, Box<dyn std::error::Error>> {
    let mut login = LoginFlow::new(state.api.clone(), state.tokens.clone());

    loop {
        let prompt = match login.step() {
            LoginStep::EnterEmail => "Enter your email:",
            LoginStep::EnterOtp => "Enter OTP:",
            LoginStep::Verified => return Ok(Some(Navigation::Home)),
        };
        let Some(line) = read_line(input, prompt).await else {
            return Ok(None);
        };
        login.clear_message();

        match login.step() {
            LoginStep::EnterEmail => {
                login.send_otp(&line).await;
            }
            LoginStep::EnterOtp => {
                match login.verify_otp(&line).await {
                    Ok(Some(nav)) => {
                        if let Some(msg) = login.message() {
                            println!("{}", msg.text);
                        }
                        return Ok(Some(nav));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        eprintln!("{}", e.user_message());
                        continue;
                    }
                }
            }
            LoginStep::Verified => {}
        }

        if let Some(msg) = login.message() {
            if msg.is_error {
                eprintln!("{}", msg.text);
            } else {
                println!("{}", msg.text);
            }
        }
    }
}

const HELP: &str = "commands: tab add|list|routine, name <text>, course <code>, section <n>, \
interval <minutes>, form, submit, list, delete <id>, search <term>, routine, logout, quit";

async fn run_home(mut home: HomeController, input: &Input) -> Result<Option<Navigation>, Box<dyn std::error::Error>> {
    println!("Welcome to NotifySeat, {}", home.session().email);
    println!("{}", HELP);

    loop {
        println!("{}", render::render_tabs(home.tab()));
        let Some(line) = read_line(input, ">").await else {
            return Ok(None);
        };
        let line = line.trim();
        let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        match cmd {
            "" => {}
            "help" => println!("{}", HELP),
            "tab" => match Tab::parse(arg) {
                Some(tab) => {
                    home.select_tab(tab);
                }
                None => eprintln!("unknown tab {:?}", arg),
            },
            "name" => home.form_mut().student_name = arg.to_string(),
            "course" => home.form_mut().course_code = arg.to_string(),
            "section" => home.form_mut().section = arg.to_string(),
            "interval" => match arg.parse::<f64>() {
                Ok(minutes) => home.form_mut().interval_minutes = minutes,
                Err(_) => eprintln!("interval must be a number of minutes"),
            },
            "form" => {
                let form = home.form();
                println!(
                    "email: {}\nname: {}\ncourse: {}\nsection: {}\ninterval (min): {}",
                    home.session().email,
                    form.student_name,
                    form.course_code,
                    form.section,
                    form.interval_minutes
                );
            }
            "submit" => {
                // errors are already shown as notices
                let _ = home.submit_watch().await;
            }
            "list" => {
                home.refresh().await;
                print!("{}", render::render_watch_table(&home.watches()));
            }
            "delete" => {
                let _ = home.delete_watch(arg).await;
            }
            "search" => {
                home.set_search(arg);
                print!("{}", render::render_routine_table(&home.visible_routine()));
            }
            "routine" => {
                if home.tab() != Tab::BrowseRoutine {
                    eprintln!("switch to the routine tab first: tab routine");
                } else {
                    print!("{}", render::render_routine_table(&home.visible_routine()));
                }
            }
            "logout" => {
                // a failed logout is already shown as a notice
                if let Ok(nav) = home.logout().await {
                    return Ok(Some(nav));
                }
            }
            "quit" | "exit" => return Ok(None),
            other => eprintln!("unknown command {:?}", other),
        }
    }
}
