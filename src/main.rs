//! Pokelist - infinite-scroll Pokemon catalog TUI

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokelist::action::Action;
use pokelist::api::{list_all_references, CatalogSource, PokeApiClient};
use pokelist::components::{
    CatalogList, CatalogListProps, Component, DetailPanel, DetailPanelProps, NotFoundPage,
    NotFoundProps,
};
use pokelist::config::{
    CatalogConfig, DEFAULT_BASE_URL, DEFAULT_FETCH_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};
use pokelist::effect::Effect;
use pokelist::loader::fill_page;
use pokelist::reducer::reducer;
use pokelist::route::Route;
use pokelist::state::{AppState, PAGE_SIZE};

const TICK_MS: u64 = 120;

/// Browse the Pokemon catalog with infinite scroll and prefix search
#[derive(Parser, Debug)]
#[command(name = "pokelist")]
#[command(about = "Infinite-scroll Pokemon catalog built on tui-dispatch")]
struct Args {
    /// PokeAPI base URL
    #[arg(long, env = "POKEAPI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Items fetched per page-fill
    #[arg(long, default_value_t = PAGE_SIZE)]
    page_size: usize,

    /// Pause between detail fetches inside one page-fill
    #[arg(long, default_value_t = DEFAULT_FETCH_DELAY_MS)]
    fetch_delay_ms: u64,

    /// Per-request timeout in seconds (minimum 1)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Start at this path, e.g. `/pokemon/25`
    #[arg(long, default_value = "/")]
    route: String,

    /// Log file (defaults to pokelist.log in the temp dir)
    #[arg(long, env = "POKELIST_LOG")]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokelistComponentId {
    List,
    Detail,
    NotFound,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokelistContext {
    List,
    Search,
    Detail,
    NotFound,
}

impl EventRoutingState<PokelistComponentId, PokelistContext> for AppState {
    fn focused(&self) -> Option<PokelistComponentId> {
        match self.route {
            Route::List => Some(PokelistComponentId::List),
            Route::Detail { .. } => Some(PokelistComponentId::Detail),
            Route::NotFound { .. } => Some(PokelistComponentId::NotFound),
        }
    }

    fn modal(&self) -> Option<PokelistComponentId> {
        None
    }

    fn binding_context(&self, id: PokelistComponentId) -> PokelistContext {
        match id {
            PokelistComponentId::List if self.search_active => PokelistContext::Search,
            PokelistComponentId::List => PokelistContext::List,
            PokelistComponentId::Detail => PokelistContext::Detail,
            PokelistComponentId::NotFound => PokelistContext::NotFound,
        }
    }

    fn default_context(&self) -> PokelistContext {
        PokelistContext::List
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        base_url,
        page_size,
        fetch_delay_ms,
        timeout_secs,
        route,
        log_file,
        debug: debug_args,
    } = Args::parse();

    init_tracing(log_file)?;

    let config = CatalogConfig::new(&base_url, page_size, fetch_delay_ms, timeout_secs);
    let client = PokeApiClient::new(config.clone()).map_err(io::Error::other)?;
    let source: Arc<dyn CatalogSource> = Arc::new(client);
    tracing::info!(
        base_url = %config.base_url,
        page_size = config.page_size,
        fetch_delay_ms,
        %route,
        "starting pokelist"
    );

    let debug = DebugSession::new(debug_args);

    let start_route = Route::parse(&route);
    let start_page_size = config.page_size;
    let mut state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(start_route, start_page_size))
        })
        .await
        .map_err(debug_error)?;
    if let Ok(size) = crossterm::terminal::size() {
        state.terminal_size = size;
    }

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        replay_actions,
        EffectRuntime {
            source,
            config: Arc::new(config),
        },
    )
    .await;

    // ===== Cleanup =====
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
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("pokelist exited");
    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_tracing(log_file: Option<PathBuf>) -> io::Result<()> {
    let path = log_file.unwrap_or_else(|| std::env::temp_dir().join("pokelist.log"));
    let file = File::create(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(io::Error::other)
}

struct PokelistUi {
    list: CatalogList,
    detail: DetailPanel,
    not_found: NotFoundPage,
}

impl PokelistUi {
    fn new() -> Self {
        Self {
            list: CatalogList::new(),
            detail: DetailPanel,
            not_found: NotFoundPage,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokelistComponentId>,
    ) {
        let is_focused = render_ctx.is_focused();
        match &state.route {
            Route::List => {
                event_ctx.set_component_area(PokelistComponentId::List, area);
                self.list
                    .render(frame, area, CatalogListProps { state, is_focused });
            }
            Route::Detail { .. } => {
                event_ctx.set_component_area(PokelistComponentId::Detail, area);
                self.detail
                    .render(frame, area, DetailPanelProps { state, is_focused });
            }
            Route::NotFound { path } => {
                event_ctx.set_component_area(PokelistComponentId::NotFound, area);
                self.not_found
                    .render(frame, area, NotFoundProps { path, is_focused });
            }
        }
    }

    fn handle_event(
        &mut self,
        id: PokelistComponentId,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions: Vec<_> = match (id, &state.route) {
            (PokelistComponentId::List, Route::List) => self
                .list
                .handle_event(
                    event,
                    CatalogListProps {
                        state,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
            (PokelistComponentId::Detail, Route::Detail { .. }) => self
                .detail
                .handle_event(
                    event,
                    DetailPanelProps {
                        state,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
            (PokelistComponentId::NotFound, Route::NotFound { path }) => self
                .not_found
                .handle_event(
                    event,
                    NotFoundProps {
                        path,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
            _ => Vec::new(),
        };
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

/// Shared by every spawned effect task.
#[derive(Clone)]
struct EffectRuntime {
    source: Arc<dyn CatalogSource>,
    config: Arc<CatalogConfig>,
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    runtime_deps: EffectRuntime,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokelistUi::new()));
    let mut bus: EventBus<AppState, Action, PokelistComponentId, PokelistContext> =
        EventBus::new();
    let keybindings: Keybindings<PokelistContext> = Keybindings::new();

    for id in [
        PokelistComponentId::List,
        PokelistComponentId::Detail,
        PokelistComponentId::NotFound,
    ] {
        let ui_handle = Rc::clone(&ui);
        bus.register(id, move |event, state| {
            ui_handle.borrow_mut().handle_event(id, &event.kind, state)
        });
    }

    // Card grid reflows with the terminal width
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => HandlerResponse {
            actions: vec![Action::UiTerminalResize(width, height)],
            consumed: false,
            needs_render: true,
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

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, runtime_deps.clone()),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, deps: EffectRuntime) {
    match effect {
        Effect::LoadReferences => {
            let batch = deps.config.index_batch;
            ctx.tasks()
                .spawn(TaskKey::new("reference_index"), async move {
                    match list_all_references(deps.source.as_ref(), batch).await {
                        Ok(references) => Action::ReferencesDidLoad(references),
                        Err(error) => {
                            tracing::warn!(%error, "reference index request failed");
                            Action::ReferencesDidError(error.to_string())
                        }
                    }
                });
        }
        Effect::FillPage {
            generation,
            page,
            request,
        } => {
            tracing::debug!(generation, page, "spawning page-fill");
            let delay = deps.config.fetch_delay;
            // One fill in flight; a newer one replaces the old task
            ctx.tasks().spawn(TaskKey::new("page_fill"), async move {
                match fill_page(deps.source.as_ref(), &request, delay).await {
                    Ok(batch) => Action::PageDidLoad {
                        generation,
                        page,
                        items: batch.items,
                        has_more: batch.has_more,
                    },
                    Err(error) => {
                        tracing::warn!(generation, page, %error, "page-fill failed");
                        Action::PageDidError {
                            generation,
                            page,
                            error: error.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadDetail { id } => {
            ctx.tasks().spawn(TaskKey::new("detail"), async move {
                let result = deps.source.fetch_detail_by_id(&id).await;
                match result {
                    Ok(detail) => Action::DetailDidLoad { id, detail },
                    Err(error) => {
                        tracing::warn!(%id, %error, "detail request failed");
                        Action::DetailDidError {
                            id,
                            error: error.to_string(),
                        }
                    }
                }
            });
        }
    }
}
