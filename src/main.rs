use std::f32::consts::TAU;

use anyhow::Context;
use clap::Parser;
use maze_chase::config::{Difficulty, GameConfig};
use maze_chase::events::GameEvent;
use maze_chase::game::Game;
use maze_chase::input::{InputState, MoveButtons};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Runs the maze-chase simulation headless with a wandering player.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Number of simulation steps to run.
    #[arg(long, default_value_t = 3600)]
    frames: u32,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Seed for both the simulation and the wandering input.
    #[arg(long)]
    seed: Option<u64>,
    /// Use classic ghost personalities instead of brutal pursuit.
    #[arg(long)]
    classic: bool,
}

/// Random walk input: holds a key set and heading for a while, then picks new ones.
struct Wanderer {
    rng: SmallRng,
    frames_left: u32,
    input: InputState,
}

impl Wanderer {
    const CHOICES: [MoveButtons; 4] = [
        MoveButtons::FORWARD,
        MoveButtons::FORWARD.union(MoveButtons::STRAFE_LEFT),
        MoveButtons::FORWARD.union(MoveButtons::STRAFE_RIGHT),
        MoveButtons::BACKWARD,
    ];

    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            frames_left: 0,
            input: InputState::locked(),
        }
    }

    fn next(&mut self) -> InputState {
        if self.frames_left == 0 {
            let buttons = Self::CHOICES[self.rng.random_range(0..Self::CHOICES.len())];
            self.input = self.input.with_buttons(buttons).with_yaw(self.rng.random_range(0.0..TAU));
            self.frames_left = self.rng.random_range(20..90);
        }
        self.frames_left -= 1;
        self.input
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default())
        .try_init()
        .context("Could not set global default subscriber")?;

    let config = GameConfig {
        difficulty: if cli.classic {
            Difficulty::Classic
        } else {
            Difficulty::Brutal
        },
        seed: cli.seed,
        ..GameConfig::default()
    };
    let mut game = Game::new(config).context("Could not create game")?;
    let mut wanderer = Wanderer::new(cli.seed.unwrap_or_else(rand::random));
    let dt = 1.0 / cli.fps.max(1) as f32;

    info!(frames = cli.frames, fps = cli.fps, classic = cli.classic, "Starting headless run");
    for frame in 0..cli.frames {
        for event in game.step(wanderer.next(), dt) {
            match event {
                GameEvent::LevelStarted { .. }
                | GameEvent::LevelCompleted { .. }
                | GameEvent::LifeLost { .. }
                | GameEvent::GhostEaten { .. }
                | GameEvent::GameOver
                | GameEvent::GameWon => info!(frame, ?event, "Game event"),
                _ => debug!(frame, ?event, "Game event"),
            }
        }
        if game.phase().is_finished() {
            break;
        }
    }

    let progression = game.progression();
    info!(
        score = progression.score,
        lives = progression.lives,
        level = progression.level_index,
        coins = progression.coins_collected,
        phase = <&'static str>::from(progression.phase),
        "Run finished"
    );
    Ok(())
}
