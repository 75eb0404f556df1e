//! Runtime: event loop, terminal lifecycle and effect execution.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop over terminal input, animation ticks and
//!   settled payments.
//! - Execute the `Effect`s components return: payments run as Tokio tasks
//!   through the configured `PaymentGateway` and report back as
//!   `Msg::PaymentSettled`.
//!
//! Input comes from a dedicated task that blocks on `crossterm::event::read()`
//! and forwards events over a channel. Ticks are fast only while a payment is
//! in flight, so an idle storefront costs next to nothing.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use checkout_engine::PaymentGateway;
use checkout_types::{Effect, Msg, PaymentError, PaymentRequest, Receipt, SubmissionTicket};
use checkout_util::CheckoutConfig;
use crossterm::event::MouseEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::task::{AbortHandle, JoinError};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::main_component::MainView;
use crate::ui::theme::Theme;

type Settlement = (SubmissionTicket, Result<Result<Receipt, PaymentError>, JoinError>);

/// Payments currently being processed by the gateway.
pub struct PaymentTasks {
    gateway: Arc<dyn PaymentGateway>,
    running: FuturesUnordered<BoxFuture<'static, Settlement>>,
    aborts: HashMap<SubmissionTicket, AbortHandle>,
}

impl PaymentTasks {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            gateway,
            running: FuturesUnordered::new(),
            aborts: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub fn spawn(&mut self, ticket: SubmissionTicket, request: PaymentRequest) {
        let gateway = Arc::clone(&self.gateway);
        info!(%ticket, product = %request.product.name, "Submitting payment");
        let handle = tokio::spawn(async move { gateway.submit(request).await });
        self.aborts.insert(ticket, handle.abort_handle());
        self.running.push(async move { (ticket, handle.await) }.boxed());
    }

    /// Abandons the payment for `ticket`; its task will not report back.
    pub fn cancel(&mut self, ticket: SubmissionTicket) {
        if let Some(handle) = self.aborts.remove(&ticket) {
            debug!(%ticket, "Cancelling payment");
            handle.abort();
        }
    }

    /// Waits for the next payment to settle. Cancelled payments are skipped;
    /// returns `None` once nothing is left running.
    pub async fn next(&mut self) -> Option<Msg> {
        while let Some((ticket, joined)) = self.running.next().await {
            self.aborts.remove(&ticket);
            let result = match joined {
                Ok(result) => result,
                Err(error) if error.is_cancelled() => {
                    debug!(%ticket, "Cancelled payment task finished");
                    continue;
                }
                Err(error) => {
                    warn!(%ticket, %error, "Payment task failed");
                    Err(PaymentError::Unavailable(format!("payment task failed: {error}")))
                }
            };
            return Some(Msg::PaymentSettled { ticket, result });
        }
        None
    }
}

/// Spawn a dedicated input task that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_event: Option<Instant> = Some(Instant::now());

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).is_ok_and(|ready| ready) {
                match event::read() {
                    Ok(event) => {
                        // Throttle mouse moves events to once per 16 ms.
                        let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                        let should_send = !is_mouse_move || last_mouse_event.is_some_and(|last| last.elapsed() >= sixteen_ms);
                        if is_mouse_move && should_send {
                            last_mouse_event = Some(Instant::now());
                        }

                        if should_send && let Err(e) = sender.send(event).await {
                            warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read event: {}", e);
                        break;
                    }
                }
            } else if sender.is_closed() {
                break;
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Whether the loop should keep running after a batch of effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

fn process_effects(effects: Vec<Effect>, payments: &mut PaymentTasks) -> Flow {
    let mut flow = Flow::Continue;
    for effect in effects {
        match effect {
            Effect::SubmitPayment { ticket, request } => payments.spawn(ticket, request),
            Effect::CancelSubmission(ticket) => payments.cancel(ticket),
            Effect::Quit => flow = Flow::Exit,
        }
    }
    flow
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the event
/// producer, runs the async event loop, and performs cleanup on exit.
pub async fn run_app(config: CheckoutConfig, theme: Box<dyn Theme>, gateway: Arc<dyn PaymentGateway>) -> Result<()> {
    let mut app = App::new(&config, theme)?;
    let mut main_view = MainView::default();
    let mut payments = PaymentTasks::new(gateway);

    let mut input_receiver = spawn_input_thread().await;
    let mut terminal = setup_terminal()?;

    // Ticking strategy: fast while a payment is processing, very slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;
    info!("Checkout started");

    loop {
        let target_interval = if app.is_processing() { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let mut needs_render = false;
        let mut effects: Vec<Effect> = Vec::new();
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; break out to shut down cleanly.
                    break;
                };
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                needs_render = true;
            }

            _ = ticker.tick() => {
                let animating = app.is_processing();
                effects.extend(main_view.handle_message(&mut app, Msg::Tick));
                needs_render = animating;
            }

            Some(msg) = payments.next(), if !payments.is_empty() => {
                effects.extend(main_view.handle_message(&mut app, msg));
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if process_effects(effects, &mut payments) == Flow::Exit {
            break;
        }
        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    info!("Checkout exiting");
    cleanup_terminal(&mut terminal)?;
    Ok(())
}
