//! Special Day entry point
//!
//! On the web the game is driven from JavaScript through `special_day::web`.
//! Natively this is a headless CLI for autoplaying rounds and inspecting
//! leaderboards and maze layouts.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow, bail};
    use clap::{Parser, Subcommand};

    use special_day::persistence::FileStore;
    use special_day::platform;
    use special_day::sim::{GameState, MazeGrid, MazeState, TickInput};
    use special_day::{GameKind, Leaderboard, Round, Session, SessionKey, SessionPhase};

    #[derive(Parser, Debug)]
    #[command(name = "special-day")]
    #[command(about = "Headless runner for the Special Day arcade games")]
    struct Cli {
        /// Directory holding leaderboard and settings files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand, Debug)]
    enum Commands {
        /// Let the autopilot play one dodger round and submit the score
        Autoplay {
            #[arg(long, default_value = "special-day", value_parser = parse_dodger)]
            game: GameKind,
            /// Run seed (random if omitted)
            #[arg(long)]
            seed: Option<u64>,
            /// Stop the round after this many ticks (60 per second)
            #[arg(long, default_value_t = 36_000)]
            max_ticks: u64,
            /// Initials to enter if the score qualifies
            #[arg(long, default_value = "CPU")]
            name: String,
        },
        /// Print a game's leaderboard
        Leaderboard {
            #[arg(long, default_value = "special-day", value_parser = parse_game)]
            game: GameKind,
        },
        /// Validate a maze layout and show where the player and target start
        Maze {
            /// Layout file (`#` walls, `.` floor); the built-in maze if omitted
            #[arg(long)]
            layout: Option<PathBuf>,
        },
    }

    fn parse_game(s: &str) -> Result<GameKind, String> {
        GameKind::parse(s).ok_or_else(|| format!("unknown game {s:?} (classic, special-day, maze)"))
    }

    fn parse_dodger(s: &str) -> Result<GameKind, String> {
        match parse_game(s)? {
            GameKind::Maze => Err("the maze has no autopilot; use classic or special-day".into()),
            kind => Ok(kind),
        }
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        match cli.command {
            Commands::Autoplay {
                game,
                seed,
                max_ticks,
                name,
            } => autoplay(&cli.data_dir, game, seed, max_ticks, &name),
            Commands::Leaderboard { game } => {
                let store = open_store(&cli.data_dir)?;
                print_leaderboard(&Leaderboard::load(&store, game), game);
                Ok(())
            }
            Commands::Maze { layout } => inspect_maze(layout),
        }
    }

    fn open_store(dir: &std::path::Path) -> Result<FileStore> {
        FileStore::open(dir).with_context(|| format!("opening data directory {}", dir.display()))
    }

    fn autoplay(
        data_dir: &std::path::Path,
        game: GameKind,
        seed: Option<u64>,
        max_ticks: u64,
        name: &str,
    ) -> Result<()> {
        let name: special_day::Initials = name.parse().map_err(|e| anyhow!("--name: {e}"))?;
        let seed = seed.unwrap_or_else(platform::fresh_seed);
        let store = open_store(data_dir)?;
        let mut session = Session::new(GameState::new(game, seed), Box::new(store), seed);

        let started = platform::now_ms();
        session.key(SessionKey::Enter);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        while *session.phase() == SessionPhase::Playing && session.round().time_ticks < max_ticks {
            session.tick(&input);
        }

        let round = session.round();
        println!(
            "{} seed {seed}: {} tasks avoided in {:.1}s{}",
            game.title(),
            round.tasks_avoided,
            round.time_ticks as f64 / 60.0,
            if round.is_over() { "" } else { " (tick limit)" },
        );
        log::info!("Simulated {} ticks in {:.0} ms", round.time_ticks, platform::now_ms() - started);

        if matches!(session.phase(), SessionPhase::NameEntry(_)) {
            for c in name.as_str().chars() {
                session.key(SessionKey::Char(c));
            }
            match session.last_rank() {
                Some(rank) => println!("{name} placed #{rank}"),
                None => bail!("score was not recorded"),
            }
        } else if session.round().is_over() {
            println!("Score did not make the leaderboard");
        }
        print_leaderboard(session.leaderboard(), game);
        Ok(())
    }

    fn print_leaderboard(board: &Leaderboard, game: GameKind) {
        println!("{}", game.leaderboard_heading());
        if board.is_empty() {
            println!("  (no scores yet)");
        }
        for (i, entry) in board.entries().iter().enumerate() {
            println!("  {}. {}  {}", i + 1, entry.name, game.format_score(entry.score));
        }
    }

    fn inspect_maze(layout: Option<PathBuf>) -> Result<()> {
        let grid = match layout {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                MazeGrid::parse(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => MazeGrid::default_maze()?,
        };
        let state = MazeState::new(grid);
        let (width, height) = state.grid.dimensions();
        let size = state.grid.pixel_size();
        println!("{width}x{height} tiles ({}x{} px)", size.x, size.y);
        println!("player starts at {}, target at {}", state.player, state.target);
        println!("countdown {}", state.kind().format_score(state.countdown));
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is special_day::web::start, this is just to satisfy the compiler
}
