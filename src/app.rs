use crate::actions::{save_json_with_dialog, Command, CopyTarget};
use crate::inspector::{Inspector, InspectorAction};
use crate::loader::{load, LoadSnapshot, RecordId, ResourceOrigin};
use crate::notifier::{NoticeKind, Notifier};
use crate::registry::{FileDescriptor, ADD_FILE_INSTRUCTIONS};
use crate::render::{resolve_card_click, Card, CardAction, CardIntent, GridView};
use crate::store::{LoadState, ViewerStore};
use eframe::egui;
use std::fs;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

const LOAD_FAILED_MESSAGE: &str = "❌ Failed to load the JSON files";
const CARD_WIDTH: f32 = 300.0;
const CARD_HEIGHT: f32 = 168.0;

pub fn configure_egui_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    for (idx, bytes) in fallback_font_bytes().into_iter().enumerate() {
        let font_name = format!("fallback_{idx}");
        fonts
            .font_data
            .insert(font_name.clone(), egui::FontData::from_owned(bytes));
        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            if let Some(list) = fonts.families.get_mut(&family) {
                list.push(font_name.clone());
            }
        }
    }

    ctx.set_fonts(fonts);
}

/// Extra system fonts appended after egui's defaults so accented text and
/// symbols used by registry icons still render.
fn fallback_font_bytes() -> Vec<Vec<u8>> {
    #[cfg(windows)]
    const CANDIDATES: &[&str] = &[
        r"C:\Windows\Fonts\segoeui.ttf",
        r"C:\Windows\Fonts\seguisym.ttf",
    ];
    #[cfg(target_os = "macos")]
    const CANDIDATES: &[&str] = &[
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/System/Library/Fonts/Apple Symbols.ttf",
    ];
    #[cfg(all(unix, not(target_os = "macos")))]
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansSymbols2-Regular.ttf",
    ];
    #[cfg(not(any(windows, unix)))]
    const CANDIDATES: &[&str] = &[];

    CANDIDATES
        .iter()
        .filter_map(|path| fs::read(path).ok())
        .collect()
}

struct LoadRequest {
    request_id: u64,
    descriptors: Arc<Vec<FileDescriptor>>,
    origin: ResourceOrigin,
}

struct LoadResponse {
    request_id: u64,
    snapshot: LoadSnapshot,
}

fn spawn_load_worker() -> (Sender<LoadRequest>, Receiver<LoadResponse>) {
    let (tx_req, rx_req) = mpsc::channel::<LoadRequest>();
    let (tx_res, rx_res) = mpsc::channel::<LoadResponse>();

    thread::spawn(move || {
        while let Ok(mut req) = rx_req.recv() {
            while let Ok(newer) = rx_req.try_recv() {
                req = newer;
            }
            let snapshot = load(&req.descriptors, &req.origin);
            if tx_res
                .send(LoadResponse {
                    request_id: req.request_id,
                    snapshot,
                })
                .is_err()
            {
                break;
            }
        }
    });

    (tx_req, rx_res)
}

/// Everything the UI can ask for. Widgets only emit these; `dispatch` owns
/// the state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SearchChanged(String),
    Refresh,
    ShowAddFileInfo,
    Inspect(RecordId),
    CopyUrl(RecordId),
    CloseInspector,
    Inspector(InspectorAction),
    DismissNotice(u64),
}

impl From<CardIntent> for UiEvent {
    fn from(intent: CardIntent) -> Self {
        match intent {
            CardIntent::Inspect(id) => Self::Inspect(id),
            CardIntent::CopyUrl(id) => Self::CopyUrl(id),
        }
    }
}

/// Pointer presses outside the inspector window dismiss it.
fn press_closes_inspector(window: egui::Rect, press: Option<egui::Pos2>) -> bool {
    press.is_some_and(|pos| !window.contains(pos))
}

fn notice_color(kind: NoticeKind) -> egui::Color32 {
    match kind {
        NoticeKind::Success => egui::Color32::from_rgb(16, 185, 129),
        NoticeKind::Error => egui::Color32::from_rgb(239, 68, 68),
        NoticeKind::Info => egui::Color32::from_rgb(59, 130, 246),
    }
}

pub struct JsonShelfApp {
    descriptors: Arc<Vec<FileDescriptor>>,
    origin: ResourceOrigin,
    store: ViewerStore,
    inspector: Inspector,
    notifier: Notifier,
    search_text: String,
    show_add_file_info: bool,
    focus_search_requested: bool,
    /// A pointer press began while the inspector was open and is still held.
    overlay_press: bool,
    load_tx: Sender<LoadRequest>,
    load_rx: Receiver<LoadResponse>,
    next_load_request_id: u64,
    latest_load_request_id: Option<u64>,
}

impl JsonShelfApp {
    pub fn new(descriptors: Vec<FileDescriptor>, origin: ResourceOrigin) -> Self {
        let (load_tx, load_rx) = spawn_load_worker();
        let mut app = Self {
            descriptors: Arc::new(descriptors),
            origin,
            store: ViewerStore::new(),
            inspector: Inspector::new(),
            notifier: Notifier::new(),
            search_text: String::new(),
            show_add_file_info: false,
            focus_search_requested: true,
            overlay_press: false,
            load_tx,
            load_rx,
            next_load_request_id: 1,
            latest_load_request_id: None,
        };
        app.request_load();
        app
    }

    fn request_load(&mut self) {
        let request_id = self.next_load_request_id;
        self.next_load_request_id = self.next_load_request_id.saturating_add(1);
        self.latest_load_request_id = Some(request_id);
        self.store.begin_load();
        info!(request_id, files = self.descriptors.len(), "loading JSON files");

        let req = LoadRequest {
            request_id,
            descriptors: Arc::clone(&self.descriptors),
            origin: self.origin.clone(),
        };
        if self.load_tx.send(req).is_err() {
            error!(request_id, "load worker is unavailable");
            self.latest_load_request_id = None;
            self.store.fail_load(LOAD_FAILED_MESSAGE);
        }
    }

    fn poll_load_response(&mut self) {
        loop {
            match self.load_rx.try_recv() {
                Ok(response) => self.apply_load_response(response),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.store.is_loading() {
                        error!("load worker exited before finishing");
                        self.latest_load_request_id = None;
                        self.store.fail_load(LOAD_FAILED_MESSAGE);
                    }
                    break;
                }
            }
        }
    }

    fn apply_load_response(&mut self, response: LoadResponse) {
        let newer_pending = self
            .latest_load_request_id
            .is_some_and(|latest| response.request_id < latest);
        info!(
            request_id = response.request_id,
            files = response.snapshot.records.len(),
            records = response.snapshot.total_records,
            "load finished"
        );
        self.store.replace_working_set(response.snapshot);
        self.search_text.clear();
        if newer_pending {
            self.store.begin_load();
        } else {
            self.latest_load_request_id = None;
        }
    }

    /// Applies one UI event. Side effects that need the UI context come
    /// back as a `Command`.
    pub fn dispatch(&mut self, event: UiEvent) -> Option<Command> {
        match event {
            UiEvent::SearchChanged(query) => {
                self.store.set_query(query);
                None
            }
            UiEvent::Refresh => {
                self.request_load();
                None
            }
            UiEvent::ShowAddFileInfo => {
                self.show_add_file_info = true;
                None
            }
            UiEvent::Inspect(id) => {
                match self.store.find(id) {
                    Some(record) => self.inspector.open(record),
                    None => warn!(?id, "inspect requested for unknown record"),
                }
                None
            }
            UiEvent::CopyUrl(id) => self.store.find(id).map(|record| Command::Copy {
                text: record.url.clone(),
                target: CopyTarget::Url,
            }),
            UiEvent::CloseInspector => {
                self.inspector.close();
                None
            }
            UiEvent::Inspector(action) => match self.inspector.action(action) {
                Ok(command) => command,
                Err(err) => {
                    let error = format!("{err:#}");
                    warn!(%error, ?action, "inspector action failed");
                    let message = match action {
                        InspectorAction::Download => "❌ Download failed",
                        InspectorAction::CopyUrl => CopyTarget::Url.failure_message(),
                        InspectorAction::CopyData => CopyTarget::Data.failure_message(),
                    };
                    self.notifier.notify(message, NoticeKind::Error);
                    None
                }
            },
            UiEvent::DismissNotice(id) => {
                self.notifier.dismiss(id);
                None
            }
        }
    }

    fn run_command(&mut self, ctx: &egui::Context, command: Command) {
        match command {
            Command::Copy { text, target } => {
                ctx.output_mut(|o| o.copied_text = text);
                self.notifier.notify(target.success_message(), NoticeKind::Success);
            }
            Command::SaveJson {
                file_name,
                contents,
            } => match save_json_with_dialog(&file_name, &contents) {
                Ok(Some(path)) => {
                    info!(path = %path.display(), "saved JSON download");
                    self.notifier
                        .notify(format!("💾 Saved {}", path.display()), NoticeKind::Success);
                }
                Ok(None) => {
                    self.notifier.notify("Download cancelled", NoticeKind::Info);
                }
                Err(err) => {
                    let error = format!("{err:#}");
                    warn!(%error, "download failed");
                    self.notifier
                        .notify(format!("❌ Download failed: {err}"), NoticeKind::Error);
                }
            },
        }
    }

    fn handle_events(&mut self, ctx: &egui::Context, events: Vec<UiEvent>) {
        for event in events {
            if let Some(command) = self.dispatch(event) {
                self.run_command(ctx, command);
            }
        }
    }

    fn status_text(&self) -> String {
        let loading = if self.store.is_loading() {
            " | Loading..."
        } else {
            ""
        };
        let query = if self.store.query().is_empty() {
            String::new()
        } else {
            format!(" | Filter: \"{}\"", self.store.query())
        };
        format!(
            "Files: {} | Records: {} | Showing: {}{}{} | {}",
            self.store.file_count(),
            self.store.total_records(),
            self.store.filtered().len(),
            query,
            loading,
            self.origin.describe()
        )
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        let ctrl_mod = egui::Modifiers {
            ctrl: true,
            ..Default::default()
        };
        if ctx.input_mut(|i| i.consume_key(ctrl_mod, egui::Key::L)) {
            self.focus_search_requested = true;
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::F5)) {
            events.push(UiEvent::Refresh);
        }
        if self.inspector.is_open()
            && ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape))
        {
            events.push(UiEvent::CloseInspector);
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui, events: &mut Vec<UiEvent>) {
        ui.horizontal(|ui| {
            ui.heading("📦 JSON Shelf");
            ui.separator();
            ui.label(format!("Files: {}", self.store.file_count()));
            ui.label(format!("Records: {}", self.store.total_records()));
            if self.store.is_loading() {
                ui.spinner();
            }
        });

        ui.horizontal(|ui| {
            let buttons_width = 220.0;
            let field_width = (ui.available_width() - buttons_width).max(160.0);
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search_text)
                    .desired_width(field_width)
                    .hint_text("🔍 Search JSON files by name or description..."),
            );
            if self.focus_search_requested {
                response.request_focus();
                self.focus_search_requested = false;
            }
            if response.changed() {
                events.push(UiEvent::SearchChanged(self.search_text.clone()));
            }
            if ui.button("🔄 Refresh").clicked() {
                events.push(UiEvent::Refresh);
            }
            if ui.button("➕ Add JSON").clicked() {
                events.push(UiEvent::ShowAddFileInfo);
            }
        });
    }

    fn show_card(ui: &mut egui::Ui, card: &Card) -> Option<CardIntent> {
        let (rect, body) =
            ui.allocate_exact_size(egui::vec2(CARD_WIDTH, CARD_HEIGHT), egui::Sense::click());
        let body = body.on_hover_cursor(egui::CursorIcon::PointingHand);
        let visuals = ui.visuals();
        let fill = visuals.faint_bg_color;
        let stroke = if body.hovered() {
            egui::Stroke::new(1.5, visuals.selection.stroke.color)
        } else {
            visuals.widgets.noninteractive.bg_stroke
        };
        ui.painter().rect(rect, 10.0, fill, stroke);

        let mut action = None;
        ui.allocate_new_ui(egui::UiBuilder::new().max_rect(rect.shrink(12.0)), |ui| {
            // Selectable labels would swallow clicks meant for the card.
            ui.style_mut().interaction.selectable_labels = false;
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&card.icon).size(28.0));
                ui.vertical(|ui| {
                    ui.add(egui::Label::new(egui::RichText::new(&card.name).strong()).truncate());
                    ui.label(egui::RichText::new(format!("{} KB", card.size_kb)).weak());
                });
            });
            if let Some(description) = &card.description {
                ui.add(egui::Label::new(egui::RichText::new(description).weak()).truncate());
            }
            ui.horizontal(|ui| {
                ui.label(format!("Records: {}", card.records));
                ui.separator();
                ui.label(format!("Type: {}", card.kind_label));
            });
            ui.horizontal(|ui| {
                if ui.button("👁 View").clicked() {
                    action = Some(CardAction::View);
                }
                if ui.button("🔗 URL").clicked() {
                    action = Some(CardAction::CopyUrl);
                }
            });
        });

        resolve_card_click(card.id, body.clicked(), action)
    }

    fn show_grid(&self, ui: &mut egui::Ui, events: &mut Vec<UiEvent>) {
        let nothing_loaded = self.store.file_count() == 0;
        match self.store.load_state() {
            LoadState::Loading | LoadState::Idle if nothing_loaded => {
                ui.centered_and_justified(|ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading JSON files...");
                    });
                });
                return;
            }
            LoadState::Failed(message) if nothing_loaded => {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new(message).size(18.0));
                });
                return;
            }
            _ => {}
        }

        match self.store.grid() {
            GridView::NoResults => {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new("🔍 No results").size(18.0).weak());
                });
            }
            GridView::Cards(cards) => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.spacing_mut().item_spacing = egui::vec2(14.0, 14.0);
                            for card in &cards {
                                if let Some(intent) = Self::show_card(ui, card) {
                                    events.push(intent.into());
                                }
                            }
                        });
                    });
            }
        }
    }

    fn show_inspector(&self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        let Some(open) = self.inspector.current() else {
            return;
        };
        let mut keep_open = true;
        let title = format!("{} {}", open.record.icon, open.record.name);
        let shown = egui::Window::new(title)
            .id(egui::Id::new("inspector"))
            .open(&mut keep_open)
            .collapsible(false)
            .resizable(true)
            .default_size([760.0, 540.0])
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("🔗 Copy URL").clicked() {
                        events.push(UiEvent::Inspector(InspectorAction::CopyUrl));
                    }
                    if ui.button("📋 Copy JSON").clicked() {
                        events.push(UiEvent::Inspector(InspectorAction::CopyData));
                    }
                    if ui.button("💾 Download").clicked() {
                        events.push(UiEvent::Inspector(InspectorAction::Download));
                    }
                });
                ui.label(egui::RichText::new(&open.record.url).small().weak());
                ui.separator();
                egui::ScrollArea::both()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let mut body = open.pretty.as_str();
                        ui.add(
                            egui::TextEdit::multiline(&mut body)
                                .code_editor()
                                .desired_width(f32::INFINITY),
                        );
                    });
            });

        if !keep_open {
            events.push(UiEvent::CloseInspector);
            return;
        }
        if let Some(inner) = shown {
            let rect = inner.response.rect;
            let press = ctx.input(|i| {
                if i.pointer.any_pressed() {
                    i.pointer.press_origin()
                } else {
                    None
                }
            });
            if press_closes_inspector(rect, press) {
                events.push(UiEvent::CloseInspector);
            }
        }
    }

    fn show_add_file_info(&mut self, ctx: &egui::Context) {
        if !self.show_add_file_info {
            return;
        }
        egui::Window::new("➕ Add a JSON file")
            .open(&mut self.show_add_file_info)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(ADD_FILE_INSTRUCTIONS);
            });
    }

    fn show_toasts(&self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        if self.notifier.is_empty() {
            return;
        }
        let now = Instant::now();
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in self.notifier.toasts() {
                    let alpha = toast.opacity(now);
                    let response = egui::Frame::none()
                        .fill(notice_color(toast.kind).gamma_multiply(alpha))
                        .rounding(10.0)
                        .inner_margin(egui::Margin::symmetric(16.0, 10.0))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&toast.message)
                                    .color(egui::Color32::WHITE.gamma_multiply(alpha)),
                            );
                        })
                        .response
                        .interact(egui::Sense::click());
                    if response.clicked() {
                        events.push(UiEvent::DismissNotice(toast.id));
                    }
                    ui.add_space(6.0);
                }
            });
    }

    /// While the inspector is open, and until a press that began then is
    /// released, the header and grid behave as if covered by a backdrop.
    fn background_blocked(&mut self, ctx: &egui::Context) -> bool {
        if self.inspector.is_open() && ctx.input(|i| i.pointer.any_pressed()) {
            self.overlay_press = true;
        }
        self.inspector.is_open() || self.overlay_press
    }

    fn show_frame(&mut self, ctx: &egui::Context) {
        self.poll_load_response();
        self.notifier.prune(Instant::now());

        let mut events = Vec::new();
        self.handle_shortcuts(ctx, &mut events);
        let blocked = self.background_blocked(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            let mut header_events = Vec::new();
            ui.add_enabled_ui(!blocked, |ui| self.show_header(ui, &mut header_events));
            if !blocked {
                events.extend(header_events);
            }
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status")
            .resizable(false)
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.add(egui::Label::new(self.status_text()).truncate());
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut grid_events = Vec::new();
            ui.add_enabled_ui(!blocked, |ui| self.show_grid(ui, &mut grid_events));
            if !blocked {
                events.extend(grid_events);
            }
        });

        self.show_inspector(ctx, &mut events);
        self.show_add_file_info(ctx);
        self.show_toasts(ctx, &mut events);

        self.handle_events(ctx, events);

        if !ctx.input(|i| i.pointer.any_down()) {
            self.overlay_press = false;
        }
        if self.store.is_loading() || !self.notifier.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}

impl eframe::App for JsonShelfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_frame(ctx);
    }
}
