//! Carrot Catch entry point
//!
//! On the web this wires the simulation to DOM elements and browser timers.
//! Natively it plays a seeded headless session with a simple bot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, MouseEvent, TouchEvent};

    use carrot_catch::platform::web::BrowserTimers;
    use carrot_catch::sim::{Phase, PlayArea};
    use carrot_catch::{Game, Settings, Theme, View};

    /// DOM side of the game: element handles and item node bookkeeping
    struct Stage {
        document: Document,
        play_area: HtmlElement,
        player: HtmlElement,
        items: HashMap<u32, HtmlElement>,
        settings: Settings,
    }

    impl Stage {
        fn new(document: Document, settings: Settings) -> Self {
            let play_area = html_by_id(&document, "play-area");
            let player = html_by_id(&document, "player");
            let stage = Self {
                document,
                play_area,
                player,
                items: HashMap::new(),
                settings,
            };
            stage.apply_theme();
            stage
        }

        fn apply_theme(&self) {
            let theme = self.settings.theme;
            self.play_area
                .set_class_name(&format!("play-area {}", theme.css_class()));
        }

        fn cycle_theme(&mut self) {
            let themes = Theme::ALL;
            let index = themes
                .iter()
                .position(|t| *t == self.settings.theme)
                .unwrap_or(0);
            self.settings.theme = themes[(index + 1) % themes.len()];
            self.settings.save();
            self.apply_theme();
            // Item glyphs belong to the old theme
            self.clear_items();
            log::info!("Theme: {}", self.settings.theme.as_str());
        }

        fn play_area_rect(&self) -> PlayArea {
            let rect = self.play_area.get_bounding_client_rect();
            PlayArea::new(rect.left() as f32, rect.width() as f32)
        }

        fn clear_items(&mut self) {
            for (_, el) in self.items.drain() {
                el.remove();
            }
        }

        /// Mirror the simulation snapshot into the DOM
        fn render(&mut self, view: &View) {
            self.set_visible("menu", view.phase == Phase::Menu);
            self.set_visible("game-over", view.phase == Phase::GameOver);
            self.set_visible("hud", view.phase == Phase::Playing);

            if let Some(el) = self.document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&view.score.to_string()));
            }
            if let Some(el) = self.document.get_element_by_id("final-score") {
                el.set_text_content(Some(&view.score.to_string()));
            }
            if let Some(el) = self.document.get_element_by_id("hud-speed") {
                if self.settings.show_speed {
                    el.set_text_content(Some(&format!("{:.2}", view.speed)));
                } else {
                    el.set_text_content(None);
                }
            }

            let _ = self
                .player
                .style()
                .set_property("left", &format!("{:.2}%", view.player_x));
            self.player.set_class_name(if view.jumping {
                "player jumping"
            } else {
                "player"
            });

            self.sync_items(view);
        }

        fn sync_items(&mut self, view: &View) {
            // Drop nodes for caught/missed items
            self.items.retain(|id, el| {
                let alive = view.items.iter().any(|item| item.id == *id);
                if !alive {
                    el.remove();
                }
                alive
            });

            for item in view.items {
                if !self.items.contains_key(&item.id) {
                    match self.create_item_node() {
                        Some(el) => {
                            self.items.insert(item.id, el);
                        }
                        None => continue,
                    }
                }
                if let Some(el) = self.items.get(&item.id) {
                    let style = el.style();
                    let _ = style.set_property("left", &format!("{:.2}%", item.x()));
                    let _ = style.set_property("top", &format!("{:.2}%", item.y()));
                }
            }
        }

        fn create_item_node(&self) -> Option<HtmlElement> {
            let el = self
                .document
                .create_element("div")
                .ok()?
                .dyn_into::<HtmlElement>()
                .ok()?;
            el.set_class_name("item");
            el.set_text_content(Some(self.settings.theme.item_label()));
            if let Err(e) = self.play_area.append_child(&el) {
                log::warn!("Failed to add item node: {:?}", e);
                return None;
            }
            Some(el)
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }
    }

    /// Game instance holding all state
    struct App {
        game: Game<BrowserTimers>,
        stage: Stage,
    }

    impl App {
        fn render(&mut self) {
            let App { game, stage } = self;
            stage.render(&game.view());
        }
    }

    fn html_by_id(document: &Document, id: &str) -> HtmlElement {
        document
            .get_element_by_id(id)
            .unwrap_or_else(|| panic!("missing #{id}"))
            .dyn_into()
            .unwrap_or_else(|_| panic!("#{id} is not an HTML element"))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Carrot Catch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let mut settings = Settings::load();
        // ?theme= overrides the saved theme for this visit only
        if let Some(theme) = window
            .location()
            .search()
            .ok()
            .and_then(|search| Theme::from_query(&search))
        {
            settings.theme = theme;
        }
        let tuning = settings.tuning();
        let seed = js_sys::Date::now() as u64;

        let app = Rc::new_cyclic(|weak: &Weak<RefCell<App>>| {
            let spawn_target = weak.clone();
            let frame_target = weak.clone();
            let timers = BrowserTimers::new(
                window.clone(),
                move || {
                    if let Some(app) = spawn_target.upgrade() {
                        app.borrow_mut().game.on_spawn_timer();
                    }
                },
                move |time| {
                    if let Some(app) = frame_target.upgrade() {
                        let mut app = app.borrow_mut();
                        app.game.on_frame(time);
                        app.render();
                    }
                },
            );
            RefCell::new(App {
                game: Game::new(timers, tuning, seed),
                stage: Stage::new(document.clone(), settings),
            })
        });

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&app);
        setup_buttons(&app);
        setup_teardown(&app);

        app.borrow_mut().render();
        log::info!("Carrot Catch ready");
    }

    fn setup_input_handlers(app: &Rc<RefCell<App>>) {
        let play_area = app.borrow().stage.play_area.clone();

        // Mouse move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut app = app.borrow_mut();
                let area = app.stage.play_area_rect();
                app.game.on_pointer(event.client_x() as f32, area);
            });
            let _ = play_area
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut app = app.borrow_mut();
                    let area = app.stage.play_area_rect();
                    app.game.on_pointer(touch.client_x() as f32, area);
                }
            });
            let _ = play_area
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut app = app.borrow_mut();
                match event.key().as_str() {
                    "t" | "T" => app.stage.cycle_theme(),
                    "s" | "S" => {
                        app.stage.settings.show_speed = !app.stage.settings.show_speed;
                        app.stage.settings.save();
                    }
                    _ => return,
                }
                app.render();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: &Rc<RefCell<App>>) {
        let document = app.borrow().stage.document.clone();

        bind_button(&document, app, "start-btn", |app| app.game.start_session());
        bind_button(&document, app, "restart-btn", |app| app.game.restart_session());
        bind_button(&document, app, "end-btn", |app| {
            app.game.end_session();
        });
    }

    fn bind_button(document: &Document, app: &Rc<RefCell<App>>, id: &str, action: fn(&mut App)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("No #{} button", id);
            return;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut app = app.borrow_mut();
            action(&mut *app);
            app.stage.clear_items();
            app.render();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_teardown(app: &Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            // Disarm timers before the page goes away
            if app.borrow_mut().game.end_session() {
                log::info!("Session ended on page hide");
            }
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Carrot Catch (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    headless::play(seed, 60_000.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use carrot_catch::platform::ManualTimers;
    use carrot_catch::sim::{PlayArea, SimEvent};
    use carrot_catch::{Game, Settings};

    /// 60 Hz display refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Play one session for `duration_ms` of virtual time with a chasing bot
    pub fn play(seed: u64, duration_ms: f64) {
        let settings = Settings::load();
        let mut game = Game::new(ManualTimers::new(), settings.tuning(), seed);
        // Percent coordinates double as client coordinates
        let area = PlayArea::new(0.0, 100.0);

        game.start_session();
        log::info!("Headless session with seed {} ({:?})", seed, game.tuning());

        let (mut caught, mut missed) = (0u32, 0u32);
        let mut elapsed = 0.0;
        while elapsed < duration_ms {
            // Chase the lowest item that can still be caught
            let target = game
                .session()
                .items
                .iter()
                .filter(|item| item.y() < carrot_catch::consts::CATCH_BAND_MAX)
                .max_by(|a, b| a.y().total_cmp(&b.y()))
                .map(|item| item.x());
            if let Some(x) = target {
                game.on_pointer(x, area);
            }

            for event in game.step(FRAME_MS) {
                match event {
                    SimEvent::Caught { .. } => caught += 1,
                    SimEvent::Missed { .. } => missed += 1,
                    SimEvent::Spawned { .. } => {}
                }
            }
            elapsed += FRAME_MS;
        }

        game.end_session();
        log::info!("Caught {}, missed {}", caught, missed);
        match serde_json::to_string(&game.view()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize final view: {}", e),
        }
    }
}
