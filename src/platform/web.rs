//! Browser glue: DOM surfaces, keyboard input, requestAnimationFrame loop
//!
//! Exposes `start_game(config)` / `stop_game()` to the page. One runner
//! exists at a time; starting again tears the previous one down.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

use super::{
    HudIssue, PLAY_FIELD_POSITION, apply_key, check_hud, frame_delta, player_start_styles,
    replace_run,
};
use crate::config::{GameConfig, Tuning};
use crate::consts::MAX_FRAME_DT;
use crate::error::GameError;
use crate::objectives::{ObjectiveObserver, Objectives};
use crate::persistence::{BestScoreStore, LocalBestScore};
use crate::presentation::PresentationTable;
use crate::session::{GameSession, RenderSink};
use crate::sim::{Bounds, Entity, GamePhase, MoveIntent, TickInput, rect_percent};

/// Filter applied to the play-field once a run ends
const ENDED_FILTER: &str = "grayscale(0.3)";

thread_local! {
    static RUNNER: RefCell<Option<Rc<RefCell<Runner>>>> = const { RefCell::new(None) };
}

fn document() -> Result<Document, GameError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| GameError::MissingSurface {
            id: "document".to_string(),
        })
}

fn html_by_id(document: &Document, id: &str) -> Result<HtmlElement, GameError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| GameError::MissingSurface { id: id.to_string() })
}

fn count_by_id(document: &Document, id: &str) -> u32 {
    document
        .query_selector_all(&format!("#{}", id))
        .map(|list| list.length())
        .unwrap_or(0)
}

fn bounds_of(element: &Element) -> Bounds {
    let rect = element.get_bounding_client_rect();
    Bounds {
        left: rect.left() as f32,
        top: rect.top() as f32,
        width: rect.width() as f32,
        height: rect.height() as f32,
    }
}

fn set_percent(el: &HtmlElement, property: &str, value: f32) {
    let _ = el.style().set_property(property, &format!("{}%", value));
}

/// Resolved page elements
struct Surfaces {
    play_field: HtmlElement,
    player: HtmlElement,
    score: Option<Element>,
    lives: Option<Element>,
}

impl Surfaces {
    /// Look everything up; the play-field and player are required
    fn resolve(document: &Document, config: &GameConfig) -> Result<Self, GameError> {
        let play_field = html_by_id(document, &config.play_field_id)?;
        let player = html_by_id(document, &config.player_id)?;

        let mut score = document.get_element_by_id(&config.score_id);
        let mut lives = document.get_element_by_id(&config.lives_id);
        let aliased = match (&score, &lives) {
            (Some(s), Some(l)) => s.is_same_node(Some(l)),
            _ => false,
        };

        let issues = check_hud(
            &config.score_id,
            count_by_id(document, &config.score_id),
            &config.lives_id,
            count_by_id(document, &config.lives_id),
            aliased,
        );
        for issue in &issues {
            match issue {
                HudIssue::NotUnique { id, count } => {
                    log::warn!("Expected exactly one #{} element, found {}", id, count);
                }
                HudIssue::Aliased => {
                    log::warn!("Score and lives share one element; HUD writes disabled");
                    score = None;
                    lives = None;
                }
            }
        }

        Ok(Self {
            play_field,
            player,
            score,
            lives,
        })
    }

    /// Make the play-field the positioning context for the player and items,
    /// and give the player its default placement if the page did not
    fn place_player(&self, tuning: &Tuning) {
        let _ = self
            .play_field
            .style()
            .set_property("position", PLAY_FIELD_POSITION);
        let style = self.player.style();
        let inline = |prop: &str| {
            style
                .get_property_value(prop)
                .map(|v| !v.is_empty())
                .unwrap_or(false)
        };
        for (property, value) in player_start_styles(inline("left"), inline("top"), tuning) {
            let _ = style.set_property(property, &value);
        }
    }

    /// Player rectangle as play-field percentages
    fn player_layout(&self) -> (Vec2, Vec2) {
        let rect = rect_percent(bounds_of(&self.player), bounds_of(&self.play_field));
        (
            Vec2::new(rect.left, rect.top),
            Vec2::new(rect.width, rect.height),
        )
    }
}

/// Draws items as absolutely positioned elements inside the play-field
struct DomSink {
    document: Document,
    play_field: HtmlElement,
    player: HtmlElement,
    score: Option<Element>,
    lives: Option<Element>,
    items: HashMap<u32, HtmlElement>,
    table: PresentationTable,
}

impl DomSink {
    fn new(document: Document, surfaces: &Surfaces) -> Self {
        Self {
            document,
            play_field: surfaces.play_field.clone(),
            player: surfaces.player.clone(),
            score: surfaces.score.clone(),
            lives: surfaces.lives.clone(),
            items: HashMap::new(),
            table: PresentationTable::default(),
        }
    }

    fn create_item(&self, entity: &Entity) -> Result<HtmlElement, JsValue> {
        let hints = self.table.hints(entity.category);
        let el: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        el.set_class_name(&format!("obj {}", hints.class));
        el.set_text_content(Some(hints.glyph));
        el.set_attribute("aria-label", hints.label)?;
        el.set_attribute("role", "img")?;

        let style = el.style();
        style.set_property("position", "absolute")?;
        set_percent(&el, "width", entity.size.x);
        set_percent(&el, "height", entity.size.y);
        set_percent(&el, "left", entity.pos.x);
        set_percent(&el, "top", entity.pos.y);

        self.play_field.append_child(&el)?;
        Ok(el)
    }
}

impl RenderSink for DomSink {
    fn entity_spawned(&mut self, entity: &Entity) {
        match self.create_item(entity) {
            Ok(el) => {
                self.items.insert(entity.id, el);
            }
            Err(err) => log::warn!("Could not create element for item {}: {:?}", entity.id, err),
        }
    }

    fn entity_removed(&mut self, id: u32) {
        if let Some(el) = self.items.remove(&id) {
            el.remove();
        }
    }

    fn draw(&mut self, player: Vec2, entities: &[Entity]) {
        set_percent(&self.player, "left", player.x);
        for entity in entities {
            if let Some(el) = self.items.get(&entity.id) {
                set_percent(el, "left", entity.pos.x);
                set_percent(el, "top", entity.pos.y);
            }
        }
    }

    fn score_changed(&mut self, score: u32) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn lives_changed(&mut self, lives: u32) {
        if let Some(el) = &self.lives {
            el.set_text_content(Some(&lives.to_string()));
        }
    }

    fn game_ended(&mut self, score: u32) {
        let _ = self.play_field.style().set_property("filter", ENDED_FILTER);
        log::info!("Game over! Final score: {}", score);
    }

    fn clear(&mut self) {
        for (_, el) in self.items.drain() {
            el.remove();
        }
        let _ = self.play_field.style().remove_property("filter");
    }
}

/// Flag an objective marker as reached
fn mark_objective(id: &str) {
    let Ok(document) = document() else {
        return;
    };
    let Some(el) = document.get_element_by_id(id) else {
        log::debug!("Objective marker #{} not on page", id);
        return;
    };
    let classes = el.class_list();
    let _ = classes.add_1("completado");
    let _ = classes.remove_1("ghost");
    let _ = el.set_attribute("aria-disabled", "false");
}

type KeyHandler = Closure<dyn FnMut(KeyboardEvent)>;

/// A live run plus the browser hooks that drive it
struct Runner {
    session: GameSession,
    intent: Rc<Cell<MoveIntent>>,
    last_ts: Option<f64>,
    raf_id: Option<i32>,
    /// Bumped on teardown so frames queued before it do nothing
    generation: u64,
    key_handlers: Option<(KeyHandler, KeyHandler)>,
}

impl Runner {
    fn bind_keys(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let make = |pressed: bool| {
            let intent = self.intent.clone();
            Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut current = intent.get();
                if apply_key(&mut current, &event.key(), pressed) {
                    event.prevent_default();
                    intent.set(current);
                }
            })
        };
        let down = make(true);
        let up = make(false);
        let _ = window.add_event_listener_with_callback("keydown", down.as_ref().unchecked_ref());
        let _ = window.add_event_listener_with_callback("keyup", up.as_ref().unchecked_ref());
        self.key_handlers = Some((down, up));
    }

    fn unbind_keys(&mut self) {
        if let (Some(window), Some((down, up))) = (web_sys::window(), self.key_handlers.take()) {
            let _ = window
                .remove_event_listener_with_callback("keydown", down.as_ref().unchecked_ref());
            let _ =
                window.remove_event_listener_with_callback("keyup", up.as_ref().unchecked_ref());
        }
        self.intent.set(MoveIntent::default());
    }

    /// Detach from the browser: no more frames, no more key handling
    fn teardown(&mut self) {
        self.generation += 1;
        if let (Some(window), Some(id)) = (web_sys::window(), self.raf_id.take()) {
            let _ = window.cancel_animation_frame(id);
        }
        self.unbind_keys();
        self.last_ts = None;
    }

    fn stop(&mut self) {
        self.session.stop();
        self.teardown();
    }
}

fn request_animation_frame(runner: Rc<RefCell<Runner>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let generation = runner.borrow().generation;
    let handle = runner.clone();
    let closure = Closure::once(move |time: f64| {
        game_loop(handle, generation, time);
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => runner.borrow_mut().raf_id = Some(id),
        Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
    }
    closure.forget();
}

fn game_loop(runner: Rc<RefCell<Runner>>, generation: u64, time: f64) {
    let alive = {
        let mut r = runner.borrow_mut();
        if r.generation != generation || r.session.phase() != GamePhase::Running {
            return;
        }
        r.raf_id = None;

        let dt = frame_delta(r.last_ts, time, MAX_FRAME_DT);
        r.last_ts = Some(time);

        let input = TickInput {
            intent: r.intent.get(),
        };
        let alive = r.session.frame(&input, dt);
        if !alive {
            r.teardown();
        }
        alive
    };

    if alive {
        request_animation_frame(runner);
    }
}

fn launch(config: GameConfig) -> Result<(), GameError> {
    let document = document()?;
    let resolved = replace_run(
        || Surfaces::resolve(&document, &config),
        || {
            if let Some(previous) = stop_current() {
                previous.borrow_mut().session.clear_view();
            }
        },
    );
    let surfaces = match resolved {
        Ok(surfaces) => surfaces,
        Err(err) => {
            log::error!("Cannot start: {}", err);
            return Err(err);
        }
    };

    let tuning = Tuning::default();
    surfaces.place_player(&tuning);
    let (player_pos, player_size) = surfaces.player_layout();

    let sink = DomSink::new(document, &surfaces);
    let observer = ObjectiveObserver::new(Objectives::default(), mark_objective);
    let store = LocalBestScore::new();
    match store.read_best() {
        Ok(best) => log::info!("Best score so far: {}", best),
        Err(err) => log::warn!("Best score unavailable: {}", err),
    }

    let mut session = GameSession::new(tuning, Box::new(store), Box::new(observer), Box::new(sink));
    let seed = js_sys::Date::now() as u64;
    session.start_with_player(seed, player_pos, player_size);

    let runner = Rc::new(RefCell::new(Runner {
        session,
        intent: Rc::new(Cell::new(MoveIntent::default())),
        last_ts: None,
        raf_id: None,
        generation: 0,
        key_handlers: None,
    }));
    runner.borrow_mut().bind_keys();
    RUNNER.with(|slot| *slot.borrow_mut() = Some(runner.clone()));
    request_animation_frame(runner);
    Ok(())
}

/// Halt and detach the current run, handing it back to the caller
fn stop_current() -> Option<Rc<RefCell<Runner>>> {
    let runner = RUNNER.with(|slot| slot.borrow_mut().take())?;
    runner.borrow_mut().stop();
    Some(runner)
}

fn parse_config(config: &JsValue) -> Result<GameConfig, GameError> {
    if config.is_undefined() || config.is_null() {
        return Ok(GameConfig::default());
    }
    let json = js_sys::JSON::stringify(config)
        .ok()
        .and_then(|s| s.as_string())
        .unwrap_or_default();
    GameConfig::from_json(&json)
}

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", err).into());
    }
    log::info!("Cheese Fall loaded");
}

/// Start (or restart) a run bound to the page elements named in `config`
#[wasm_bindgen(js_name = startGame)]
pub fn start_game(config: JsValue) -> Result<(), JsValue> {
    let config = parse_config(&config).map_err(|err| JsValue::from_str(&err.to_string()))?;
    launch(config).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Halt the current run; does nothing if none is running
#[wasm_bindgen(js_name = stopGame)]
pub fn stop_game() {
    let _ = stop_current();
}

/// Stored best score (0 when unavailable)
#[wasm_bindgen(js_name = bestScore)]
pub fn best_score() -> u32 {
    LocalBestScore::new().read_best().unwrap_or(0)
}
