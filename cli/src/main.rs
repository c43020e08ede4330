use std::io::{self, BufRead, Write};

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use widgets::booking::{BookingModal, Field, ModalStatus};
use widgets::carousel::{Carousel, DEFAULT_INTERVAL, DEFAULT_ITEMS_TO_SHOW};
use widgets::chat::{ChatPanel, Role, Transcript, Turn};
use widgets::swipe::{DEFAULT_COOLDOWN, SwipeOutcome, SwipeToCall, TrackGeometry};

/// Shown when the service itself cannot be reached.
const OFFLINE_REPLY: &str = "The assistant is unreachable right now. Please call the clinic directly.";
const FALLBACK_GREETING: &str = "Hello. How can I help you today?";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("booking form incomplete: full name and phone are required")]
    IncompleteBooking,
    #[error("{0}")]
    Carousel(#[from] widgets::carousel::CarouselError),
}

#[derive(Parser, Debug)]
#[command(name = "concierge-cli", about = "Clinic concierge API client")]
struct Cli {
    #[arg(long, env = "CONCIERGE_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    /// Print the clinic profile.
    Clinic,
    /// Talk to the assistant. Reads messages from stdin unless `--message` is given.
    Chat(ChatArgs),
    /// Submit a booking request.
    Book(BookArgs),
    /// Show the testimonial carousel.
    Testimonials(TestimonialArgs),
    /// Simulate the swipe-to-call control.
    Call(CallArgs),
}

#[derive(Args, Debug)]
struct ChatArgs {
    #[arg(long, short)]
    message: Option<String>,
}

#[derive(Args, Debug)]
struct BookArgs {
    #[arg(long)]
    location: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, help = "Preferred date, YYYY-MM-DD")]
    date: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args, Debug)]
struct TestimonialArgs {
    #[arg(long, default_value_t = 0)]
    position: usize,
    #[arg(long, default_value_t = DEFAULT_ITEMS_TO_SHOW)]
    count: usize,
    #[arg(long, default_value_t = 0, help = "Auto-advance this many times, one interval apart")]
    rotate: usize,
}

#[derive(Args, Debug)]
struct CallArgs {
    #[arg(long, help = "Drag distance in pixels")]
    drag: f64,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let api = Api::new(&cli.base_url);

    match cli.command {
        Command::Ping => run_ping(&api).await,
        Command::Clinic => print_json(&api.get("/api/clinic").await?),
        Command::Chat(args) => run_chat(&api, args).await,
        Command::Book(args) => run_book(&api, args).await,
        Command::Testimonials(args) => run_testimonials(&api, args).await,
        Command::Call(args) => run_call(&api, args).await,
    }
}

// =============================================================================
// HTTP
// =============================================================================

struct Api {
    http: reqwest::Client,
    base_url: String,
}

impl Api {
    fn new(base_url: &str) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_string() }
    }

    async fn get(&self, path: &str) -> Result<Value, CliError> {
        let response = self.http.get(format!("{}{path}", self.base_url)).send().await?;
        read_json(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, CliError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, CliError> {
    let status = response.status();
    let value = response
        .json::<Value>()
        .await
        .unwrap_or_else(|_| Value::Null);
    if !status.is_success() {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), str::to_owned);
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }
    Ok(value)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

async fn run_ping(api: &Api) -> Result<(), CliError> {
    let response = api.http.get(format!("{}/healthz", api.base_url)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

// =============================================================================
// CHAT
// =============================================================================

async fn run_chat(api: &Api, args: ChatArgs) -> Result<(), CliError> {
    let greeting = api
        .get("/api/clinic")
        .await
        .ok()
        .and_then(|v| v.get("greeting").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| FALLBACK_GREETING.to_owned());
    let mut panel = ChatPanel::new(&greeting);
    panel.toggle();
    print_turn(&panel.transcript().turns()[0]);

    if let Some(message) = args.message {
        panel.set_draft(message);
        return send_draft(api, &mut panel).await;
    }

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        panel.set_draft(line?);
        send_draft(api, &mut panel).await?;
        prompt()?;
    }
    Ok(())
}

async fn send_draft(api: &Api, panel: &mut ChatPanel) -> Result<(), CliError> {
    let Some(message) = panel.begin_send() else {
        return Ok(());
    };
    let body = serde_json::json!({ "transcript": panel.transcript(), "message": message });

    match api.post("/api/assistant/chat", &body).await {
        Ok(value) => {
            let transcript = value
                .get("transcript")
                .cloned()
                .ok_or(CliError::MissingField("transcript"))?;
            panel.finish(serde_json::from_value::<Transcript>(transcript)?);
        }
        Err(e) if is_rejection(&e) => {
            eprintln!("message not sent: {e}");
            panel.reject();
            return Ok(());
        }
        Err(e) => {
            eprintln!("request failed: {e}");
            panel.fail(OFFLINE_REPLY);
        }
    }
    if let Some(turn) = panel.transcript().last() {
        print_turn(turn);
    }
    Ok(())
}

/// The service answered but refused the request itself (4xx). Anything else
/// means the assistant could not be reached.
fn is_rejection(err: &CliError) -> bool {
    matches!(err, CliError::ServerError { status: 400..=499, .. })
}

fn print_turn(turn: &Turn) {
    let who = match turn.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    println!("{who}: {}", turn.text);
}

fn prompt() -> Result<(), CliError> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

// =============================================================================
// BOOKING
// =============================================================================

async fn run_book(api: &Api, args: BookArgs) -> Result<(), CliError> {
    let mut modal = BookingModal::new();
    modal.open(args.location);
    modal.set_field(Field::FullName, args.name);
    modal.set_field(Field::Phone, args.phone);
    let optional = [(Field::Email, args.email), (Field::PreferredDate, args.date), (Field::Notes, args.notes)];
    for (field, value) in optional {
        if let Some(value) = value {
            modal.set_field(field, value);
        }
    }

    let submission = modal.begin_submit().ok_or(CliError::IncompleteBooking)?;
    let result = api.post("/api/bookings", &serde_json::to_value(&submission)?).await;
    let id = result
        .as_ref()
        .ok()
        .and_then(|v| v.get("id").and_then(Value::as_str).map(str::to_owned));
    if let Err(e) = &result {
        eprintln!("booking failed: {e}");
    }
    modal.finish(result.map(|_| ()));

    match modal.status() {
        ModalStatus::Succeeded => println!("booking received: {}", id.unwrap_or_default()),
        _ => println!("{}", modal.error().unwrap_or_default()),
    }
    Ok(())
}

// =============================================================================
// TESTIMONIALS
// =============================================================================

async fn run_testimonials(api: &Api, args: TestimonialArgs) -> Result<(), CliError> {
    let list = api.get("/api/testimonials").await?;
    let records = list.as_array().cloned().unwrap_or_default();

    let mut carousel = Carousel::new(records.len(), args.count, DEFAULT_INTERVAL)?;
    carousel.jump(args.position % records.len())?;

    for step in 0..=args.rotate {
        if step > 0 {
            carousel.tick(DEFAULT_INTERVAL);
            println!();
        }
        println!("-- position {} of {} --", carousel.position() + 1, carousel.len());
        for record in carousel.visible(&records) {
            let author = record.get("author").and_then(Value::as_str).unwrap_or("?");
            let rating = record.get("rating").and_then(Value::as_u64).unwrap_or(0);
            println!("{author} ({rating}/5)");
        }
    }
    Ok(())
}

// =============================================================================
// SWIPE TO CALL
// =============================================================================

async fn run_call(api: &Api, args: CallArgs) -> Result<(), CliError> {
    let clinic = api.get("/api/clinic").await?;
    let dial_uri = clinic
        .get("dial_uri")
        .and_then(Value::as_str)
        .ok_or(CliError::MissingField("dial_uri"))?;

    let mut control = SwipeToCall::new(TrackGeometry::default(), dial_uri);
    control.press();
    let offset = control.drag_to(args.drag);
    println!("handle at {offset:.0}px ({:.0}%)", control.progress() * 100.0);

    match control.release() {
        SwipeOutcome::Fired { dial_uri: target } => {
            println!("calling {target}");
            println!("control inert for {}s", DEFAULT_COOLDOWN.as_secs());
        }
        SwipeOutcome::SnappedBack => println!("released early; handle snapped back"),
        SwipeOutcome::Ignored => {}
    }
    Ok(())
}
