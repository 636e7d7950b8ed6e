use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, ListState, Paragraph},
};
use tokio::runtime::Runtime;

use crate::cli::Cli;
use crate::source::FsSource;
use crate::tree::FileTree;

/// Runs the interactive browser over a real directory until the user quits.
pub fn run(cli_args: Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;

    let source = FsSource::new(&cli_args.root)
        .include_ignored(cli_args.include_ignored)
        .show_hidden(cli_args.hidden);
    let mut tree = FileTree::new(source);
    runtime.block_on(tree.load_root())?;

    let title = format!(" {} ", cli_args.root.display());
    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, &runtime, &mut tree, &title);
    restore_terminal(terminal)?;
    result
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor().map_err(Into::into)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    runtime: &Runtime,
    tree: &mut FileTree<FsSource>,
    title: &str,
) -> Result<()> {
    let mut cursor: usize = 0;
    let mut list_state = ListState::default();
    let mut list_inner = Rect::default();

    loop {
        if tree.len() > 0 {
            cursor = cursor.min(tree.len() - 1);
        }
        list_state.select((tree.len() > 0).then_some(cursor));
        terminal.draw(|frame| {
            list_inner = draw_frame(frame, tree, &mut list_state, title);
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => {
                    cursor = cursor.saturating_add(1);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    cursor = cursor.saturating_sub(1);
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let multi = key.modifiers.contains(KeyModifiers::CONTROL);
                    runtime.block_on(tree.click(cursor, multi))?;
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    let multi = mouse.modifiers.contains(KeyModifiers::CONTROL);
                    match hit_test(
                        list_inner,
                        list_state.offset(),
                        tree.len(),
                        mouse.column,
                        mouse.row,
                    ) {
                        Some(index) => {
                            cursor = index;
                            runtime.block_on(tree.click(index, multi))?;
                        }
                        None => tree.deactivate_all(),
                    }
                }
            }
            _ => {}
        }
    }
}

fn draw_frame(
    frame: &mut Frame,
    tree: &FileTree<FsSource>,
    list_state: &mut ListState,
    title: &str,
) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(chunks[0]);
    let list = tree
        .widget()
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol("❯ ");
    frame.render_stateful_widget(list, chunks[0], list_state);

    let active = tree.active_items();
    let status = if active.is_empty() {
        "click: select | ctrl+click: multi | enter/space: activate | jk/arrows: move | q: quit"
            .to_owned()
    } else {
        format!("{} selected", active.len())
    };
    frame.render_widget(Paragraph::new(status), chunks[1]);

    inner
}

/// Maps a pointer position to a row index; `None` means the interaction
/// landed outside the interactive surface (borders, status line, or the
/// empty space past the last row).
fn hit_test(inner: Rect, offset: usize, len: usize, column: u16, row: u16) -> Option<usize> {
    if column < inner.x
        || column >= inner.x.saturating_add(inner.width)
        || row < inner.y
        || row >= inner.y.saturating_add(inner.height)
    {
        return None;
    }
    let index = offset + (row - inner.y) as usize;
    (index < len).then_some(index)
}
