mod logging;
mod trace;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use swipedeck::{
    feedback::{FeedbackAction, HapticPulse},
    AnimationRequest, CardDeck, Decision, DeckListener, EngineConfig, FeedbackSink,
    SlideListener, SlideToConfirm, Vector2, Vote,
};

use logging::Logger;
use trace::{load_expected, load_trace, PointerPhase, TraceLine};

#[derive(Debug, Parser)]
#[command(name = "deck_replay")]
#[command(about = "Replay recorded pointer traces through the swipe deck engine")]
struct Cli {
    trace: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Mode::Deck)]
    mode: Mode,
    #[arg(long, default_value_t = 10)]
    cards: u32,
    /// File with one expected business event kind per line.
    #[arg(long)]
    expect: Option<PathBuf>,
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Deck,
    Slide,
}

#[derive(Clone, Debug)]
struct ReplayEvent {
    ms: u64,
    kind: &'static str,
    detail: String,
    business: bool,
}

#[derive(Default)]
struct Recorder {
    now_ms: u64,
    events: Vec<ReplayEvent>,
}

impl Recorder {
    fn push(&mut self, kind: &'static str, detail: String, business: bool) {
        self.events.push(ReplayEvent {
            ms: self.now_ms,
            kind,
            detail,
            business,
        });
    }
}

impl FeedbackSink for Recorder {
    fn on_offset(&mut self, card: usize, offset: Vector2) {
        self.push("offset", format!("{card},{:.1},{:.1}", offset.x, offset.y), false);
    }

    fn on_animate(&mut self, card: usize, request: &AnimationRequest) {
        self.push(
            "animate",
            format!(
                "{card},{:?},{:.1},{:.1},{}",
                request.kind, request.to.x, request.to.y, request.duration_ms
            ),
            false,
        );
    }

    fn on_returned(&mut self, card: usize) {
        self.push("returned", card.to_string(), true);
    }

    fn on_haptic(&mut self, pulse: HapticPulse) {
        self.push("haptic", format!("{:?}", pulse.tier), false);
    }

    fn on_shake(&mut self, action: FeedbackAction) {
        self.push("shake", format!("{action:?}"), false);
    }
}

impl DeckListener<u32> for Recorder {
    fn on_commit(&mut self, decision: &Decision<u32>) {
        let kind = match decision.outcome {
            Vote::Positive => "commit_positive",
            Vote::Negative => "commit_negative",
            Vote::Pass => "pass",
        };
        self.push(kind, decision.payload.to_string(), true);
    }

    fn on_overflow(&mut self) {
        self.push("overflow", String::new(), true);
    }

    fn on_ledger_full(&mut self) {
        self.push("ready", String::new(), true);
    }

    fn on_pass_rejected(&mut self) {
        self.push("pass_rejected", String::new(), true);
    }

    fn on_tap(&mut self, card: usize) {
        self.push("tap", card.to_string(), true);
    }
}

impl SlideListener for Recorder {
    fn on_confirmed(&mut self) {
        self.push("confirmed", String::new(), true);
    }
}

enum Surface {
    Deck(CardDeck<u32, Recorder>),
    Slide(SlideToConfirm<Recorder>),
}

impl Surface {
    fn recorder_mut(&mut self) -> &mut Recorder {
        match self {
            Self::Deck(deck) => deck.listener_mut(),
            Self::Slide(slider) => slider.listener_mut(),
        }
    }

    fn dispatch(&mut self, line: TraceLine) {
        self.recorder_mut().now_ms = line.ms();
        match (self, line) {
            (Self::Deck(deck), TraceLine::Pointer { phase, sample }) => match phase {
                PointerPhase::Down => deck.pointer_down(sample),
                PointerPhase::Move => deck.pointer_move(sample),
                PointerPhase::Up => deck.pointer_up(sample),
                PointerPhase::Cancel => deck.pointer_cancel(sample),
            },
            (Self::Deck(deck), TraceLine::Tick { ms }) => deck.tick(ms),
            (Self::Slide(slider), TraceLine::Pointer { phase, sample }) => match phase {
                PointerPhase::Down => slider.pointer_down(sample),
                PointerPhase::Move => slider.pointer_move(sample),
                PointerPhase::Up => slider.pointer_up(sample),
                PointerPhase::Cancel => slider.pointer_cancel(sample),
            },
            (Self::Slide(slider), TraceLine::Tick { ms }) => slider.tick(ms),
        }
    }

    /// Feeds every line, then ticks far enough past the last one to settle
    /// any animation still running.
    fn replay(&mut self, lines: Vec<TraceLine>, settle_ms: u32) {
        let mut last_ms = 0;
        for line in lines {
            last_ms = last_ms.max(line.ms());
            self.dispatch(line);
        }
        self.dispatch(TraceLine::Tick {
            ms: last_ms.saturating_add(u64::from(settle_ms) + 1),
        });
    }

    fn business_kinds(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .filter(|event| event.business)
            .map(|event| event.kind)
            .collect()
    }

    fn events(&self) -> &[ReplayEvent] {
        match self {
            Self::Deck(deck) => &deck.listener().events,
            Self::Slide(slider) => &slider.listener().events,
        }
    }

    fn print_summary(&self) {
        match self {
            Self::Deck(deck) => {
                let ledger = deck.ledger();
                println!(
                    "ledger,{}/{},skips={},cursor={}",
                    ledger.len(),
                    ledger.capacity(),
                    ledger.skip_budget(),
                    ledger.cursor()
                );
                for (idx, decision) in ledger.items().iter().enumerate() {
                    println!(
                        "vote,{idx},{},{}",
                        decision.outcome.label(),
                        decision.payload
                    );
                }
            }
            Self::Slide(slider) => {
                println!(
                    "slider,confirmed={},position={:.1}",
                    slider.is_confirmed(),
                    slider.position()
                );
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    Logger::from_env(level)?.install()?;

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let lines = load_trace(&cli.trace)?;
    log::info!("replaying {} trace lines", lines.len());

    let mut surface = match cli.mode {
        Mode::Deck => Surface::Deck(CardDeck::new(
            (0..cli.cards).collect(),
            &config,
            Recorder::default(),
        )),
        Mode::Slide => Surface::Slide(SlideToConfirm::new(&config, Recorder::default())),
    };

    let settle_ms = config
        .animation
        .commit_duration_ms
        .max(config.animation.return_duration_ms);
    surface.replay(lines, settle_ms);

    println!("event,ms,kind,detail");
    for event in surface.events() {
        if event.business || cli.verbose {
            println!("event,{},{},{}", event.ms, event.kind, event.detail);
        }
    }
    surface.print_summary();

    if let Some(path) = &cli.expect {
        let expected = load_expected(path)?;
        let actual = surface.business_kinds();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            bail!("event sequence mismatch");
        }
    }

    Ok(())
}
