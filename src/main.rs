use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dexview::action::Action;
use dexview::api::{self, HttpSource, JsonSource, API_BASE};
use dexview::audio;
use dexview::effect::Effect;
use dexview::reducer::reducer;
use dexview::settings;
use dexview::state::{AppState, Language, LimitTier};
use dexview::ui::{DexComponentId, DexContext, DexUi, TICK_MS};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

#[derive(Parser, Debug)]
#[command(name = "dexview")]
#[command(about = "Browse, search and inspect Pokemon from PokeAPI")]
struct Args {
    /// Generation whose entity limit to load (overrides saved settings)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=9))]
    tier: Option<u8>,

    /// Display language (overrides saved settings)
    #[arg(long, value_enum)]
    language: Option<Language>,

    /// Settings file (default: <config dir>/dexview/settings.json)
    #[arg(long)]
    settings_file: Option<PathBuf>,

    /// Response cache directory (default: <cache dir>/dexview)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Disable the on-disk response cache
    #[arg(long)]
    no_cache: bool,

    /// PokeAPI base URL
    #[arg(long, default_value = API_BASE)]
    api_base: String,

    /// Log file (default: <data dir>/dexview/dexview.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

struct RuntimeConfig {
    source: Arc<HttpSource>,
    settings_path: PathBuf,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let settings_path = args
        .settings_file
        .clone()
        .unwrap_or_else(settings::default_settings_path);
    let cache_dir = if args.no_cache {
        None
    } else {
        args.cache_dir.clone().or_else(|| {
            dirs_next::cache_dir().map(|dir| dir.join("dexview"))
        })
    };
    let source = HttpSource::new(args.api_base.clone(), cache_dir)
        .map_err(|err| io::Error::other(err.to_string()))?;
    let config = RuntimeConfig {
        source: Arc::new(source),
        settings_path,
    };

    let debug = DebugSession::new(args.debug);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let tier_override = args.tier.and_then(LimitTier::for_generation);
    let language_override = args.language;
    let settings_path = config.settings_path.clone();
    let state = debug
        .load_state_or_else_async(move || async move {
            let mut settings = settings::load_or_default(&settings_path).await;
            if let Some(tier) = tier_override {
                settings.tier = tier;
            }
            if let Some(language) = language_override {
                settings.language = language;
            }
            Ok::<AppState, io::Error>(AppState::new(settings, seed_from_time()))
        })
        .await
        .map_err(debug_error)?;
    log::info!(
        "starting with gen {} ({} entities), language {}",
        state.settings.tier.generation,
        state.settings.tier.limit,
        state.settings.language.code()
    );

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, config).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => dirs_next::data_local_dir()
            .map(|dir| dir.join("dexview"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dexview.log"),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn seed_from_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    config: RuntimeConfig,
) -> io::Result<DebugRunOutput<AppState>> {
    let config = Arc::new(config);
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(DexComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(DexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if !state.search.editing => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Tab => HandlerResponse::action(Action::FocusNext),
            crossterm::event::KeyCode::Char('/') => HandlerResponse::action(Action::SearchStart),
            crossterm::event::KeyCode::Char('x') => HandlerResponse::action(Action::SelectRandom),
            crossterm::event::KeyCode::Char('p') => HandlerResponse::action(Action::PlayCry),
            crossterm::event::KeyCode::Char('n') => HandlerResponse::action(Action::SelectNext),
            crossterm::event::KeyCode::Char('b') => HandlerResponse::action(Action::SelectPrev),
            crossterm::event::KeyCode::Char(']') => {
                HandlerResponse::action(Action::SettingsTierNext)
            }
            crossterm::event::KeyCode::Char('[') => {
                HandlerResponse::action(Action::SettingsTierPrev)
            }
            crossterm::event::KeyCode::Char('L') => {
                HandlerResponse::action(Action::SettingsLanguageNext)
            }
            crossterm::event::KeyCode::Char('+') | crossterm::event::KeyCode::Char('=') => {
                HandlerResponse::action(Action::SettingsVolumeUp)
            }
            crossterm::event::KeyCode::Char('-') => {
                HandlerResponse::action(Action::SettingsVolumeDown)
            }
            crossterm::event::KeyCode::Char('R') => HandlerResponse::action(Action::EntitiesReload),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, config.clone()),
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, config: Arc<RuntimeConfig>) {
    match effect {
        Effect::LoadEntities { epoch, limit } => {
            // Shared key: a newer load cancels the one in flight.
            ctx.tasks().spawn(TaskKey::new("entities"), async move {
                let source: Arc<dyn JsonSource> = config.source.clone();
                match api::fetch_all(source, limit).await {
                    Ok(entities) => {
                        log::info!("loaded {} entities (epoch {epoch})", entities.len());
                        Action::EntitiesDidLoad { epoch, entities }
                    }
                    Err(error) => Action::EntitiesDidError {
                        epoch,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::SaveSettings(settings) => {
            ctx.tasks().spawn(TaskKey::new("settings"), async move {
                match settings::save_settings(&config.settings_path, &settings).await {
                    Ok(()) => Action::SettingsDidSave,
                    Err(error) => {
                        log::warn!("{error}");
                        Action::SettingsDidError(error.to_string())
                    }
                }
            });
        }
        Effect::PlayCry { name, url, volume } => {
            ctx.tasks().spawn(TaskKey::new("cry"), async move {
                match config.source.fetch_bytes(&url).await {
                    Ok(bytes) => {
                        match tokio::task::spawn_blocking(move || audio::play_ogg(bytes, volume))
                            .await
                        {
                            Ok(Ok(())) => Action::CryDidFinish,
                            Ok(Err(error)) => Action::CryDidError(error),
                            Err(error) => Action::CryDidError(error.to_string()),
                        }
                    }
                    Err(error) => Action::CryDidError(format!("{name}: {error}")),
                }
            });
        }
    }
}
