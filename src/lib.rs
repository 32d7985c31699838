pub mod audio;
pub mod collision;
pub mod config;
pub mod entity;
pub mod game;
pub mod input;
pub mod logging;
pub mod render;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::Math;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, EventTarget, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, KeyboardEvent, Window,
};

use crate::audio::Chime;
use crate::config::{GameConfig, LaunchOptions};
use crate::game::{Game, Phase};
use crate::input::{Direction, InputState};
use crate::render::render;

/// Panels and labels around the canvas.
struct Chrome {
    menu: HtmlElement,
    game_over: HtmlElement,
    score: HtmlElement,
    final_score: HtmlElement,
}

struct AppState {
    game: Game<SmallRng>,
    input: InputState,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    chrome: Chrome,
    chime: Chime,
    document: Document,
}

/// Owns the animation-frame callback and keeps at most one frame pending.
#[derive(Default)]
struct FrameDriver {
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    pending: Cell<Option<i32>>,
}

impl FrameDriver {
    fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }

        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            return;
        };

        match window().request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(handle) => self.pending.set(Some(handle)),
            Err(err) => error!("requestAnimationFrame failed: {}", js_value_to_string(&err)),
        }
    }
}

fn window() -> Window {
    web_sys::window().expect("missing window")
}

pub(crate) fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn viewport_width() -> f64 {
    window()
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(0.0)
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{} has an unexpected element type", id)))
}

fn set_status(document: &Document, status: &str) {
    if let Some(el) = document.document_element() {
        let _ = el.set_attribute("data-game-status", status);
    }
}

fn set_hidden(element: &HtmlElement, hidden: bool) {
    let classes = element.class_list();
    let _ = if hidden {
        classes.add_1("hidden")
    } else {
        classes.remove_1("hidden")
    };
}

/// Wraps `handler` in a closure that lives for the rest of the page.
fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn size_canvas(state: &AppState) {
    state.canvas.set_width(state.game.width() as u32);
    state.canvas.set_height(state.game.height() as u32);
}

fn enter_playing(state: &mut AppState) {
    size_canvas(state);
    state.chrome.score.set_text_content(Some("0"));
    set_hidden(&state.chrome.menu, true);
    set_hidden(&state.chrome.game_over, true);
    set_status(&state.document, Phase::Playing.name());
    state.chime.prime();
}

fn show_game_over(state: &AppState) {
    let score = state.game.score().to_string();
    state.chrome.final_score.set_text_content(Some(&score));
    set_hidden(&state.chrome.game_over, false);
    set_status(&state.document, Phase::GameOver.name());
}

/// One animation frame. Returns whether another frame should be scheduled.
fn run_frame(state: &mut AppState) -> bool {
    if !state.game.should_continue() {
        return false;
    }

    let outcome = state.game.advance_frame(&state.input);
    if outcome.stars_collected > 0 {
        let score = state.game.score().to_string();
        state.chrome.score.set_text_content(Some(&score));
        for _ in 0..outcome.stars_collected {
            state.chime.play();
        }
    }
    if outcome.game_over {
        show_game_over(state);
    }

    render(&state.game, &mut state.ctx);
    state.game.should_continue()
}

fn wire_press_region(
    region: &HtmlElement,
    direction: Direction,
    state: &Rc<RefCell<AppState>>,
) -> Result<(), JsValue> {
    for (kind, pressed) in [("touchstart", true), ("touchend", false), ("touchcancel", false)] {
        let state = Rc::clone(state);
        listen(region, kind, move |_event: Event| {
            state.borrow_mut().input.set(direction, pressed);
        })?;
    }
    Ok(())
}

fn wire_keyboard(document: &Document, state: &Rc<RefCell<AppState>>) -> Result<(), JsValue> {
    for (kind, pressed) in [("keydown", true), ("keyup", false)] {
        let state = Rc::clone(state);
        listen(document, kind, move |event: Event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if state.borrow_mut().input.apply_key(&key_event.key(), pressed) {
                event.prevent_default();
            }
        })?;
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let search = window().location().search().unwrap_or_default();
    let options = LaunchOptions::from_query(&search);
    logging::init(options.log_level);

    if let Err(err) = start_impl(options) {
        if let Some(document) = web_sys::window().and_then(|win| win.document()) {
            set_status(&document, "error");
        }
        error!("fatal: {}", js_value_to_string(&err));
    }
}

impl AppState {
    /// Looks up the canvas and chrome and builds a game waiting on the menu.
    fn from_document(document: &Document, config: GameConfig, seed: u64) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = element_by_id(document, "gameCanvas")?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let chrome = Chrome {
            menu: element_by_id(document, "menu")?,
            game_over: element_by_id(document, "gameOver")?,
            score: element_by_id(document, "stars")?,
            final_score: element_by_id(document, "finalScore")?,
        };

        Ok(Self {
            game: Game::new(config, viewport_width(), SmallRng::seed_from_u64(seed)),
            input: InputState::default(),
            canvas,
            ctx,
            chrome,
            chime: Chime::new(),
            document: document.clone(),
        })
    }
}

fn wire_round_buttons(
    document: &Document,
    state: &Rc<RefCell<AppState>>,
    driver: &Rc<FrameDriver>,
) -> Result<(), JsValue> {
    let start_button: HtmlButtonElement = element_by_id(document, "startBtn")?;
    let reset_button: HtmlButtonElement = element_by_id(document, "playAgainBtn")?;

    {
        let state = Rc::clone(state);
        let driver = Rc::clone(driver);
        listen(&start_button, "click", move |_event: Event| {
            let mut st = state.borrow_mut();
            if !st.game.start(viewport_width()) {
                return;
            }
            enter_playing(&mut st);
            drop(st);
            driver.request();
        })?;
    }

    let state = Rc::clone(state);
    let driver = Rc::clone(driver);
    listen(&reset_button, "click", move |_event: Event| {
        let mut st = state.borrow_mut();
        st.game.reset(viewport_width());
        enter_playing(&mut st);
        drop(st);
        driver.request();
    })
}

fn start_impl(options: LaunchOptions) -> Result<(), JsValue> {
    let document = window()
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let seed = options
        .seed
        .unwrap_or_else(|| (Math::random() * u64::MAX as f64) as u64);
    info!("seed {}", seed);
    let state = Rc::new(RefCell::new(AppState::from_document(
        &document,
        GameConfig::default(),
        seed,
    )?));
    let left_region: HtmlElement = element_by_id(&document, "leftBtn")?;
    let right_region: HtmlElement = element_by_id(&document, "rightBtn")?;

    {
        let mut state = state.borrow_mut();
        size_canvas(&state);
        let AppState { game, ctx, .. } = &mut *state;
        render(game, ctx);
        set_status(&document, Phase::Menu.name());
    }

    let driver = Rc::new(FrameDriver::default());
    {
        let state_frame = Rc::clone(&state);
        let driver_frame: Weak<FrameDriver> = Rc::downgrade(&driver);
        let callback = Closure::wrap(Box::new(move |_ts: f64| {
            let Some(driver) = driver_frame.upgrade() else {
                return;
            };
            driver.pending.set(None);

            let keep_going = run_frame(&mut state_frame.borrow_mut());
            if keep_going {
                driver.request();
            }
        }) as Box<dyn FnMut(f64)>);
        *driver.callback.borrow_mut() = Some(callback);
    }

    wire_round_buttons(&document, &state, &driver)?;
    wire_press_region(&left_region, Direction::Left, &state)?;
    wire_press_region(&right_region, Direction::Right, &state)?;
    wire_keyboard(&document, &state)?;

    // Key-up events are lost while the page is in the background.
    let state_blur = Rc::clone(&state);
    listen(&window(), "blur", move |_event: Event| {
        state_blur.borrow_mut().input.clear();
    })?;

    Ok(())
}
