use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use canvas::align::{AlignEdge, DistributeAxis};
use canvas::camera::Point;
use canvas::consts::SNAP_THRESHOLD;
use canvas::doc::{Board, ItemId, LayoutDirection, ViewMode, new_id};
use canvas::geom::{Rect, snap, snap_point};
use canvas::guides::compute_guides;
use canvas::hit::{ResizeAnchor, resize_rect};
use clap::{Args, Parser, Subcommand, ValueEnum};
use moodboard::config::{AppConfig, ConfigError};
use moodboard::error::{ErrorCode, error_json};
use moodboard::kv::{FileKvStore, KvError};
use moodboard::services::board::{BoardError, BoardStore, Command, Snapshot, place_note};
use moodboard::services::export::{ExportError, write_export};
use moodboard::services::ingest::{Liveness, ingest_files};
use moodboard::services::persistence::{PersistError, flush_now, load_snapshot, spawn_persistence_task};
use moodboard::state::AppState;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Kv(#[from] KvError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("there are no boards")]
    NoBoards,
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Kv(e) => e.error_code(),
            Self::Persist(e) => e.error_code(),
            Self::Board(e) => e.error_code(),
            Self::Export(e) => e.error_code(),
            Self::Json(_) => "E_JSON",
            Self::NoBoards => "E_NO_BOARDS",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Kv(e) => e.retryable(),
            Self::Persist(e) => e.retryable(),
            _ => false,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "moodboard", about = "Moodboard boards, images, notes and groups from the command line")]
struct Cli {
    /// Directory of the local key-value store.
    #[arg(long, env = "MOODBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Grid snap size in canvas units.
    #[arg(long)]
    grid_size: Option<f64>,

    /// Disable grid snapping for this invocation.
    #[arg(long)]
    no_snap: bool,

    /// Board to operate on; defaults to the active board.
    #[arg(long, global = true, env = "MOODBOARD_BOARD")]
    board: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    Board(BoardCommand),
    Image(ImageCommand),
    Note(NoteCommand),
    Item(ItemCommand),
    Group(GroupCommand),
    /// Align items to a shared edge or center line.
    Align {
        edge: EdgeArg,
        #[arg(required = true, num_args = 2..)]
        ids: Vec<ItemId>,
    },
    /// Space items evenly between the outermost two.
    Distribute {
        axis: AxisArg,
        #[arg(required = true, num_args = 3..)]
        ids: Vec<ItemId>,
    },
    /// Alignment guides an item currently produces against the rest of the board.
    Guides { id: ItemId },
    /// Export the board as JSON, optionally with its images.
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
        #[arg(long)]
        images: bool,
    },
}

#[derive(Args, Debug)]
struct BoardCommand {
    #[command(subcommand)]
    command: BoardSubcommand,
}

#[derive(Subcommand, Debug)]
enum BoardSubcommand {
    List,
    Create { name: String },
    Rename { board_id: ItemId, name: String },
    Delete { board_id: ItemId },
    Use { board_id: ItemId },
    View { mode: ViewArg },
    Clear,
}

#[derive(Args, Debug)]
struct ImageCommand {
    #[command(subcommand)]
    command: ImageSubcommand,
}

#[derive(Subcommand, Debug)]
enum ImageSubcommand {
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct NoteCommand {
    #[command(subcommand)]
    command: NoteSubcommand,
}

#[derive(Subcommand, Debug)]
enum NoteSubcommand {
    Add {
        text: String,
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
        #[arg(long)]
        color: Option<String>,
    },
    Text { id: ItemId, text: String },
    Color { id: ItemId, color: String },
}

#[derive(Args, Debug)]
struct ItemCommand {
    #[command(subcommand)]
    command: ItemSubcommand,
}

#[derive(Subcommand, Debug)]
enum ItemSubcommand {
    Move { id: ItemId, x: f64, y: f64 },
    Resize { id: ItemId, width: f64, height: f64 },
    Delete { id: ItemId },
}

#[derive(Args, Debug)]
struct GroupCommand {
    #[command(subcommand)]
    command: GroupSubcommand,
}

#[derive(Subcommand, Debug)]
enum GroupSubcommand {
    Create {
        name: String,
        #[arg(required = true, num_args = 2..)]
        ids: Vec<ItemId>,
    },
    Rename { id: ItemId, name: String },
    Ungroup { id: ItemId },
    Delete { id: ItemId },
    Direction { id: ItemId, direction: DirectionArg },
    Gap { id: ItemId, gap: f64 },
    Move { id: ItemId, dx: f64, dy: f64 },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EdgeArg {
    Left,
    Right,
    Center,
    Top,
    Bottom,
    Middle,
}

impl From<EdgeArg> for AlignEdge {
    fn from(edge: EdgeArg) -> Self {
        match edge {
            EdgeArg::Left => Self::Left,
            EdgeArg::Right => Self::Right,
            EdgeArg::Center => Self::Center,
            EdgeArg::Top => Self::Top,
            EdgeArg::Bottom => Self::Bottom,
            EdgeArg::Middle => Self::Middle,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AxisArg {
    Horizontal,
    Vertical,
}

impl From<AxisArg> for DistributeAxis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::Horizontal => Self::Horizontal,
            AxisArg::Vertical => Self::Vertical,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ViewArg {
    Grid,
    Freeform,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirectionArg {
    Horizontal,
    Vertical,
    Toggle,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, code = e.error_code(), "command failed");
            println!("{}", error_json(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Value, CliError> {
    let config = load_config(&cli)?;
    let kv = FileKvStore::open(&config.data_dir)?;
    info!(data_dir = %config.data_dir.display(), "opening board store");
    let snapshot = load_snapshot(&kv)?;
    let state = AppState::new(BoardStore::new(snapshot), Arc::new(kv), config);
    let persistence = spawn_persistence_task(state.clone());

    let result = dispatch(&state, cli.board.as_deref(), cli.command).await;
    let flushed = flush_now(&state).await;
    persistence.abort();

    let value = result?;
    flushed?;
    Ok(value)
}

fn load_config(cli: &Cli) -> Result<AppConfig, CliError> {
    let mut config = AppConfig::from_env()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir.clone_from(dir);
    }
    if let Some(grid) = cli.grid_size {
        config.grid_size = grid;
    }
    if cli.no_snap {
        config.snap_to_grid = false;
    }
    config.validate()?;
    Ok(config)
}

async fn dispatch(state: &AppState, board: Option<&str>, command: CliCommand) -> Result<Value, CliError> {
    let snapshot = state.snapshot().await;
    let grid = state.config.snap_grid();

    match command {
        CliCommand::Board(cmd) => board_command(state, &snapshot, board, cmd.command).await,
        CliCommand::Image(ImageCommand { command: ImageSubcommand::Add { paths } }) => {
            let board_id = target_board(&snapshot, board)?;
            let outcomes = ingest_files(state, &board_id, &paths, &Liveness::new()).await;
            Ok(serde_json::to_value(outcomes)?)
        }
        CliCommand::Note(cmd) => {
            let board_id = target_board(&snapshot, board)?;
            let command = match cmd.command {
                NoteSubcommand::Add { text, x, y, color } => {
                    let mut note = place_note(text, Point::new(x, y), grid, OffsetDateTime::now_utc());
                    if let Some(color) = color {
                        note.color = color;
                    }
                    Command::AddNote { board_id: board_id.clone(), note }
                }
                NoteSubcommand::Text { id, text } => Command::UpdateNoteText { board_id: board_id.clone(), id, text },
                NoteSubcommand::Color { id, color } => Command::UpdateNoteColor { board_id: board_id.clone(), id, color },
            };
            apply_and_show(state, &board_id, command).await
        }
        CliCommand::Item(cmd) => {
            let board_id = target_board(&snapshot, board)?;
            let command = match cmd.command {
                ItemSubcommand::Move { id, x, y } => {
                    let p = grid.map_or(Point::new(x, y), |g| snap_point(Point::new(x, y), g));
                    Command::MoveItem { board_id: board_id.clone(), id, x: p.x, y: p.y }
                }
                ItemSubcommand::Resize { id, width, height } => {
                    let rect = resized(&snapshot, &board_id, &id, width, height, grid)?;
                    Command::UpdateItem { board_id: board_id.clone(), id, rect }
                }
                ItemSubcommand::Delete { id } => Command::DeleteItem { board_id: board_id.clone(), id },
            };
            apply_and_show(state, &board_id, command).await
        }
        CliCommand::Group(cmd) => {
            let board_id = target_board(&snapshot, board)?;
            let command = group_command(&snapshot, &board_id, cmd.command, grid)?;
            apply_and_show(state, &board_id, command).await
        }
        CliCommand::Align { edge, ids } => {
            let board_id = target_board(&snapshot, board)?;
            let command = Command::Align { board_id: board_id.clone(), ids, edge: edge.into(), grid };
            apply_and_show(state, &board_id, command).await
        }
        CliCommand::Distribute { axis, ids } => {
            let board_id = target_board(&snapshot, board)?;
            let command = Command::Distribute { board_id: board_id.clone(), ids, axis: axis.into() };
            apply_and_show(state, &board_id, command).await
        }
        CliCommand::Guides { id } => {
            let board = resolve_board(&snapshot, board)?;
            let boxes = board.item_boxes();
            let Some(dragged) = boxes.iter().find(|b| b.id == id) else {
                return Err(BoardError::ItemNotFound(id).into());
            };
            Ok(serde_json::to_value(compute_guides(dragged, &boxes, SNAP_THRESHOLD))?)
        }
        CliCommand::Export { out, images } => {
            let board = resolve_board(&snapshot, board)?;
            let files = write_export(&out, board, OffsetDateTime::now_utc(), images).await?;
            let files: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
            Ok(json!({ "files": files }))
        }
    }
}

async fn board_command(
    state: &AppState,
    snapshot: &Snapshot,
    board: Option<&str>,
    command: BoardSubcommand,
) -> Result<Value, CliError> {
    let command = match command {
        BoardSubcommand::List => return Ok(board_list(snapshot)),
        BoardSubcommand::Create { name } => {
            Command::CreateBoard { id: new_id("board"), name, created_at: OffsetDateTime::now_utc() }
        }
        BoardSubcommand::Rename { board_id, name } => Command::RenameBoard { board_id, name },
        BoardSubcommand::Delete { board_id } => Command::DeleteBoard { board_id },
        BoardSubcommand::Use { board_id } => Command::SetActiveBoard { board_id },
        BoardSubcommand::View { mode } => {
            let view_mode = match mode {
                ViewArg::Grid => ViewMode::Grid,
                ViewArg::Freeform => ViewMode::Freeform,
            };
            Command::SetViewMode { board_id: target_board(snapshot, board)?, view_mode }
        }
        BoardSubcommand::Clear => Command::ClearBoard { board_id: target_board(snapshot, board)? },
    };
    let next = state.apply(command).await?;
    Ok(board_list(&next))
}

fn group_command(snapshot: &Snapshot, board_id: &str, command: GroupSubcommand, grid: Option<f64>) -> Result<Command, CliError> {
    let board_id = board_id.to_owned();
    let command = match command {
        GroupSubcommand::Create { name, ids } => Command::CreateGroup { board_id, group_id: new_id("group"), name, item_ids: ids },
        GroupSubcommand::Rename { id, name } => Command::RenameGroup { board_id, id, name },
        GroupSubcommand::Ungroup { id } => Command::Ungroup { board_id, id },
        GroupSubcommand::Delete { id } => Command::DeleteGroup { board_id, id },
        GroupSubcommand::Direction { id, direction } => {
            let direction = match direction {
                DirectionArg::Horizontal => LayoutDirection::Horizontal,
                DirectionArg::Vertical => LayoutDirection::Vertical,
                DirectionArg::Toggle => snapshot
                    .board(&board_id)
                    .and_then(|b| b.group(&id))
                    .map(|g| g.layout_direction.toggled())
                    .ok_or_else(|| BoardError::GroupNotFound(id.clone()))?,
            };
            Command::SetGroupDirection { board_id, id, direction }
        }
        GroupSubcommand::Gap { id, gap } => Command::SetGroupGap { board_id, id, gap },
        GroupSubcommand::Move { id, dx, dy } => {
            let anchor = snapshot
                .board(&board_id)
                .and_then(|b| b.group(&id))
                .map(|g| (g.x, g.y))
                .ok_or_else(|| BoardError::GroupNotFound(id.clone()))?;
            // The anchor lands on the grid, members follow by the same delta.
            let (dx, dy) = match grid {
                Some(g) => (snap(anchor.0 + dx, g) - anchor.0, snap(anchor.1 + dy, g) - anchor.1),
                None => (dx, dy),
            };
            Command::TranslateGroup { board_id, id, dx, dy }
        }
    };
    Ok(command)
}

/// Target rect for resizing `id` to `width` x `height` from its top-left corner,
/// with the same minimums and aspect rules as a handle drag.
fn resized(snapshot: &Snapshot, board_id: &str, id: &str, width: f64, height: f64, grid: Option<f64>) -> Result<Rect, CliError> {
    let board = snapshot.board(board_id).ok_or_else(|| BoardError::BoardNotFound(board_id.to_owned()))?;
    let (Some(kind), Some(orig)) = (board.item_kind(id), board.item_rect(id)) else {
        return Err(BoardError::ItemNotFound(id.to_owned()).into());
    };
    Ok(resize_rect(orig, ResizeAnchor::Se, kind, width - orig.width, height - orig.height, grid))
}

async fn apply_and_show(state: &AppState, board_id: &str, command: Command) -> Result<Value, CliError> {
    let next = state.apply(command).await?;
    let board = next.board(board_id).ok_or_else(|| BoardError::BoardNotFound(board_id.to_owned()))?;
    Ok(serde_json::to_value(board)?)
}

fn resolve_board<'a>(snapshot: &'a Snapshot, board: Option<&str>) -> Result<&'a Board, CliError> {
    match board {
        Some(id) => snapshot.board(id).ok_or_else(|| BoardError::BoardNotFound(id.to_owned()).into()),
        None => snapshot.active().ok_or(CliError::NoBoards),
    }
}

fn target_board(snapshot: &Snapshot, board: Option<&str>) -> Result<ItemId, CliError> {
    resolve_board(snapshot, board).map(|b| b.id.clone())
}

fn board_list(snapshot: &Snapshot) -> Value {
    let active = snapshot.active().map(|b| b.id.as_str());
    let boards: Vec<Value> = snapshot
        .boards
        .iter()
        .map(|b| {
            json!({
                "id": b.id,
                "name": b.name,
                "viewMode": b.view_mode,
                "images": b.images.len(),
                "notes": b.notes.len(),
                "groups": b.groups.len(),
                "active": Some(b.id.as_str()) == active,
            })
        })
        .collect();
    Value::Array(boards)
}
