use anyhow::Result;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};
use tracing_subscriber::EnvFilter;

use todo_cli::{
    application::{auth_service::{AuthService, AuthServiceImpl}, todo_service::{TodoService, TodoServiceImpl}},
    domain::{repository::{TodoRepository, UserRepository}, todo::{CreateTodo, Priority, Todo, TodoId, TodoStatus, UpdateTodo}, user::Session},
    infrastructure::{json_repo::{JsonTodoRepository, JsonUserRepository}, json_store::JsonStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let data_dir = std::env::var("TODO_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let store = JsonStore::new(&data_dir);
    let users = JsonUserRepository::new(store.clone());
    let todos = JsonTodoRepository::new(store);
    users.init().await?;
    todos.init().await?;
    let auth = AuthServiceImpl::new(users);
    let tasks = TodoServiceImpl::new(todos);
    tracing::info!(data_dir, "starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, auth, tasks).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { Menu, Login, SignUp, Tasks, Create, Edit }

#[derive(Clone, Copy, PartialEq, Eq)]
enum AuthField { Username, Password, Confirm }

#[derive(Clone, Copy, PartialEq, Eq)]
enum TaskField { Title, Details, Priority }

const MENU_ENTRIES: [&str; 3] = ["Login", "Sign Up", "Exit"];

struct App<U: UserRepository, T: TodoRepository> {
    auth: AuthServiceImpl<U>,
    tasks: TodoServiceImpl<T>,
    session: Option<Session>,
    mode: Mode,
    menu_selected: usize,
    items: Vec<Todo>,
    selected: usize,
    list_state: ListState,
    auth_field: AuthField,
    draft_username: String,
    draft_password: String,
    draft_confirm: String,
    task_field: TaskField,
    draft_title: String,
    draft_details: String,
    draft_priority: Priority,
    editing: Option<TodoId>,
    status_line: String,
}

impl<U: UserRepository, T: TodoRepository> App<U, T> {
    async fn load(&mut self) -> Result<()> {
        let Some(session) = &self.session else { return Ok(()) };
        match self.tasks.list_for_owner(session).await {
            Ok(items) => self.items = items,
            Err(e) => self.status_line = e.to_string(),
        }
        let len = self.items.len();
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            if self.selected >= len { self.selected = len - 1; }
            self.list_state.select(Some(self.selected));
        }
        Ok(())
    }

    fn clear_auth_drafts(&mut self) {
        self.auth_field = AuthField::Username;
        self.draft_username.clear();
        self.draft_password.clear();
        self.draft_confirm.clear();
    }

    fn clear_task_drafts(&mut self) {
        self.task_field = TaskField::Title;
        self.draft_title.clear();
        self.draft_details.clear();
        self.draft_priority = Priority::Mid;
        self.editing = None;
    }

    async fn submit_auth(&mut self) {
        if self.mode == Mode::SignUp && self.draft_password != self.draft_confirm {
            self.status_line = "passwords do not match".to_string();
            return;
        }
        let result = match self.mode {
            Mode::SignUp => self.auth.sign_up(self.draft_username.trim(), &self.draft_password).await,
            _ => self.auth.login(self.draft_username.trim(), &self.draft_password).await,
        };
        match result {
            Ok(user) => {
                self.session = Some(Session::for_user(&user));
                self.status_line = format!("logged in as {}", user.username);
                self.mode = Mode::Tasks;
                self.clear_auth_drafts();
            }
            Err(e) => self.status_line = e.to_string(),
        }
    }

    async fn submit_task(&mut self) {
        let Some(session) = self.session.clone() else { return };
        let result = match self.editing {
            None => {
                self.tasks
                    .create(&session, CreateTodo {
                        title: self.draft_title.trim().to_string(),
                        details: self.draft_details.trim().to_string(),
                        priority: self.draft_priority,
                    })
                    .await
            }
            Some(id) => {
                self.tasks
                    .edit(&session, id, UpdateTodo {
                        title: Some(self.draft_title.trim().to_string()),
                        details: Some(self.draft_details.trim().to_string()),
                        priority: Some(self.draft_priority),
                    })
                    .await
            }
        };
        match result {
            Ok(_) => {
                self.mode = Mode::Tasks;
                self.clear_task_drafts();
                self.status_line.clear();
            }
            Err(e) => self.status_line = e.to_string(),
        }
    }

    async fn complete_selected(&mut self) {
        let Some(session) = self.session.clone() else { return };
        if let Some(item) = self.items.get(self.selected) {
            if let Err(e) = self.tasks.mark_completed(&session, item.id).await {
                self.status_line = e.to_string();
            }
        }
    }

    fn next_auth_field(&mut self) {
        self.auth_field = match (self.mode, self.auth_field) {
            (Mode::SignUp, AuthField::Username) => AuthField::Password,
            (Mode::SignUp, AuthField::Password) => AuthField::Confirm,
            (Mode::SignUp, AuthField::Confirm) => AuthField::Username,
            (_, AuthField::Username) => AuthField::Password,
            _ => AuthField::Username,
        };
    }

    fn auth_draft_mut(&mut self) -> &mut String {
        match self.auth_field {
            AuthField::Username => &mut self.draft_username,
            AuthField::Password => &mut self.draft_password,
            AuthField::Confirm => &mut self.draft_confirm,
        }
    }
}

fn priority_label(p: Priority) -> &'static str {
    match p { Priority::High => "HIGH", Priority::Mid => "MID", Priority::Low => "LOW" }
}

fn cycle_priority(p: Priority) -> Priority {
    match p { Priority::High => Priority::Mid, Priority::Mid => Priority::Low, Priority::Low => Priority::High }
}

fn masked(s: &str) -> String {
    "*".repeat(s.chars().count())
}

async fn run_app<U: UserRepository, T: TodoRepository>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    auth: AuthServiceImpl<U>,
    tasks: TodoServiceImpl<T>,
) -> Result<()> {
    let mut app = App {
        auth,
        tasks,
        session: None,
        mode: Mode::Menu,
        menu_selected: 0,
        items: vec![],
        selected: 0,
        list_state: ListState::default(),
        auth_field: AuthField::Username,
        draft_username: String::new(),
        draft_password: String::new(),
        draft_confirm: String::new(),
        task_field: TaskField::Title,
        draft_title: String::new(),
        draft_details: String::new(),
        draft_priority: Priority::Mid,
        editing: None,
        status_line: String::new(),
    };

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
                .split(f.size());

            let header_text = match app.mode {
                Mode::Menu => "To-Do List (Up/Down: choose, Enter: select, q: quit)",
                Mode::Login => "Login (Tab: switch field, Enter: submit, Esc: back)",
                Mode::SignUp => "Sign Up (Tab: switch field, Enter: submit, Esc: back)",
                Mode::Tasks => "Tasks (Enter: mark completed, n: new, e: edit, l: logout, q: quit)",
                Mode::Create | Mode::Edit => "Task (Tab: switch field, Left/Right: priority, Enter: save, Esc: cancel)",
            };
            let header = Paragraph::new(header_text)
                .block(Block::default().borders(Borders::ALL).title("todo-cli"));
            f.render_widget(header, chunks[0]);

            match app.mode {
                Mode::Menu => {
                    let entries: Vec<ListItem> = MENU_ENTRIES.iter().map(|e| ListItem::new(*e)).collect();
                    let mut state = ListState::default();
                    state.select(Some(app.menu_selected));
                    let list = List::new(entries)
                        .block(Block::default().borders(Borders::ALL).title("welcome"))
                        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                        .highlight_symbol(">> ");
                    f.render_stateful_widget(list, chunks[1], &mut state);
                }
                Mode::Login | Mode::SignUp => {
                    let marker = |field: AuthField| if app.auth_field == field { ">" } else { " " };
                    let mut form = format!(
                        "{} Username: {}\n{} Password: {}",
                        marker(AuthField::Username), app.draft_username,
                        marker(AuthField::Password), masked(&app.draft_password),
                    );
                    if app.mode == Mode::SignUp {
                        form.push_str(&format!("\n{} Confirm:  {}", marker(AuthField::Confirm), masked(&app.draft_confirm)));
                    }
                    let title = if app.mode == Mode::Login { "login" } else { "sign up" };
                    let pane = Paragraph::new(form).block(Block::default().borders(Borders::ALL).title(title));
                    f.render_widget(pane, chunks[1]);
                }
                Mode::Tasks | Mode::Create | Mode::Edit => {
                    let middle = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                        .split(chunks[1]);

                    let list_items: Vec<ListItem> = app.items.iter().map(|t| {
                        let mark = match t.status { TodoStatus::Pending => "[ ]", TodoStatus::Completed => "[x]" };
                        ListItem::new(format!("{} [{}] {}", mark, priority_label(t.priority), t.title))
                    }).collect();
                    if app.items.is_empty() { app.list_state.select(None); } else { app.list_state.select(Some(app.selected)); }
                    let owner = app.session.as_ref().map(|s| s.username.as_str()).unwrap_or("");
                    let list = List::new(list_items)
                        .block(Block::default().borders(Borders::ALL).title(format!("tasks for {owner}")))
                        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                        .highlight_symbol(">> ");
                    f.render_stateful_widget(list, middle[0], &mut app.list_state);

                    // Details pane for the highlighted task
                    let detail = match app.items.get(app.selected) {
                        Some(t) => format!(
                            "Title:\n{}\n\nPriority: {}\nStatus: {}\n\nDetails:\n{}\n\nCreated: {}\nUpdated: {}",
                            t.title,
                            priority_label(t.priority),
                            match t.status { TodoStatus::Pending => "PENDING", TodoStatus::Completed => "COMPLETED" },
                            t.details,
                            t.created_at.to_rfc3339(),
                            t.updated_at.to_rfc3339(),
                        ),
                        None => String::new(),
                    };
                    let details = Paragraph::new(detail)
                        .block(Block::default().borders(Borders::ALL).title("details"));
                    f.render_widget(details, middle[1]);
                }
            }

            let footer_text = match app.mode {
                Mode::Create | Mode::Edit => format!(
                    "{} — {}: {}_  |  Priority=[{}]",
                    if app.mode == Mode::Create { "Add Task" } else { "Edit Task" },
                    match app.task_field { TaskField::Title => "Title", TaskField::Details => "Details", TaskField::Priority => "Priority" },
                    match app.task_field { TaskField::Title => app.draft_title.as_str(), TaskField::Details => app.draft_details.as_str(), TaskField::Priority => "" },
                    priority_label(app.draft_priority),
                ),
                _ => app.status_line.clone(),
            };
            let footer = Paragraph::new(footer_text)
                .block(Block::default().borders(Borders::ALL).title("info"));
            f.render_widget(footer, chunks[2]);
        })?;

        if let Event::Key(key) = event::read()? {
            // Only act on key presses; ignore repeats and releases to prevent duplicate input
            if key.kind != KeyEventKind::Press { continue; }
            match app.mode {
                Mode::Menu => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Up => { if app.menu_selected > 0 { app.menu_selected -= 1; } }
                    KeyCode::Down => { if app.menu_selected + 1 < MENU_ENTRIES.len() { app.menu_selected += 1; } }
                    KeyCode::Enter => {
                        app.status_line.clear();
                        match app.menu_selected {
                            0 => { app.mode = Mode::Login; app.clear_auth_drafts(); }
                            1 => { app.mode = Mode::SignUp; app.clear_auth_drafts(); }
                            _ => break,
                        }
                    }
                    _ => {}
                },
                Mode::Login | Mode::SignUp => match key.code {
                    KeyCode::Esc => { app.mode = Mode::Menu; app.clear_auth_drafts(); app.status_line.clear(); }
                    KeyCode::Tab => app.next_auth_field(),
                    KeyCode::Enter => {
                        app.submit_auth().await;
                        if app.session.is_some() { app.load().await?; }
                    }
                    KeyCode::Backspace => { app.auth_draft_mut().pop(); }
                    KeyCode::Char(c) => { app.auth_draft_mut().push(c); }
                    _ => {}
                },
                Mode::Tasks => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } }
                    KeyCode::Down => { if app.selected + 1 < app.items.len() { app.selected += 1; } }
                    KeyCode::Enter => {
                        app.complete_selected().await;
                        app.load().await?;
                    }
                    KeyCode::Char('n') => {
                        app.mode = Mode::Create;
                        app.clear_task_drafts();
                    }
                    KeyCode::Char('e') => {
                        if let Some(t) = app.items.get(app.selected) {
                            app.mode = Mode::Edit;
                            app.task_field = TaskField::Title;
                            app.draft_title = t.title.clone();
                            app.draft_details = t.details.clone();
                            app.draft_priority = t.priority;
                            app.editing = Some(t.id);
                        }
                    }
                    KeyCode::Char('l') => {
                        app.session = None;
                        app.items.clear();
                        app.selected = 0;
                        app.mode = Mode::Menu;
                        app.status_line = "logged out".to_string();
                    }
                    _ => {}
                },
                Mode::Create | Mode::Edit => match key.code {
                    KeyCode::Esc => { app.mode = Mode::Tasks; app.clear_task_drafts(); }
                    KeyCode::Enter => {
                        app.submit_task().await;
                        app.load().await?;
                    }
                    KeyCode::Tab => {
                        app.task_field = match app.task_field {
                            TaskField::Title => TaskField::Details,
                            TaskField::Details => TaskField::Priority,
                            TaskField::Priority => TaskField::Title,
                        };
                    }
                    KeyCode::Left | KeyCode::Right => {
                        if app.task_field == TaskField::Priority {
                            app.draft_priority = cycle_priority(app.draft_priority);
                        }
                    }
                    KeyCode::Backspace => {
                        match app.task_field {
                            TaskField::Title => { app.draft_title.pop(); }
                            TaskField::Details => { app.draft_details.pop(); }
                            TaskField::Priority => {}
                        }
                    }
                    KeyCode::Char(c) => {
                        match app.task_field {
                            TaskField::Title => app.draft_title.push(c),
                            TaskField::Details => app.draft_details.push(c),
                            TaskField::Priority => app.draft_priority = cycle_priority(app.draft_priority),
                        }
                    }
                    _ => {}
                },
            }
        }
    }
    Ok(())
}
