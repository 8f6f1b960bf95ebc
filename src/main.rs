//! Workout Timer - countdown sessions for scheduled workouts
//!
//! This is the main entry point for the workout-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use workout_timer::{
    api::create_router,
    config::{Command, Config, RunArgs},
    services::{daily_breakdown, BackendClient, WorkoutStats},
    state::AppState,
    tasks::{completion_sync_task, progress_log_task, IntervalTicks},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("workout_timer={},tower_http=info", config.log_level()))
        .init();

    let client = BackendClient::new(&config.api_url, config.require_token()?);

    match &config.command {
        Command::Run(args) => run(client, args).await,
        Command::Stats => stats(client).await,
    }
}

async fn run(client: BackendClient, args: &RunArgs) -> anyhow::Result<()> {
    info!("Starting workout-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Backend: {}, workout: {}", client.base_url(), args.workout_id);

    let workout = client.fetch_workout(&args.workout_id).await?;
    for exercise in &workout.exercises {
        match exercise.volume() {
            Some(volume) => info!("  - {} ({})", exercise.name, volume),
            None => info!("  - {}", exercise.name),
        }
    }

    let ticks = Arc::new(IntervalTicks::new(args.tick_period()));
    let state = Arc::new(AppState::new(args.port, args.host.clone(), ticks));

    // Subscribe before the first tick can complete a run
    tokio::spawn(completion_sync_task(
        Arc::clone(&state),
        state.subscribe_completions(),
        Arc::new(client),
    ));
    tokio::spawn(progress_log_task(Arc::clone(&state)));

    state.open_session(workout)?;
    if args.autostart {
        state.start()?;
    }

    let app = create_router(Arc::clone(&state));
    let addr = args.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start - Start or resume the countdown");
    info!("  POST /timer/pause - Pause the countdown");
    info!("  POST /timer/reset - Reset to the full duration");
    info!("  GET  /status      - Timer, workout and warnings");
    info!("  GET  /health      - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Failed to install signal handler: {}", e),
            }
        }
    }

    state.close_session();
    info!("Shutdown complete");
    Ok(())
}

async fn stats(client: BackendClient) -> anyhow::Result<()> {
    let workouts = client.list_workouts().await?;
    let stats = WorkoutStats::from_workouts(&workouts);

    println!("Total workouts:   {}", stats.total_workouts);
    println!("Calories burned:  {}", stats.total_calories);
    println!("Average duration: {} min", stats.avg_duration_minutes);
    println!("Favorite type:    {}", stats.favorite_type);

    let days = daily_breakdown(&workouts);
    if !days.is_empty() {
        println!();
        for day in days {
            println!("{:>7}  {:>5} kcal  {}", day.label(), day.calories, day.summary());
        }
    }
    Ok(())
}
