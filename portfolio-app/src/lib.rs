//! # Portfolio WASM Application
//!
//! Browser host for the portfolio site. Queries the page's fixed DOM
//! contract, wires browser events into [`portfolio_core`], and applies
//! the effect plans that come back. All decisions live in the core; this
//! crate only snapshots browser state and mutates the document.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web portfolio-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { PortfolioApp } from './pkg/portfolio_app.js';
//!
//! await init();
//! const app = new PortfolioApp();
//! app.start();
//! ```
//!
//! Every element of the DOM contract is optional: a missing element
//! silently disables only the feature that needed it.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use portfolio_core::{
    contact::{self, Field, FieldError, FormNotice, Submission},
    coordinator::ORIENTATION_SETTLE_MS,
    device::DeviceSignals,
    interaction::{card_tilt, hero_parallax, shortcut, CopyFeedback, ScrollEdge},
    lazy::{LazyImage, ERRORED_OPACITY, PLACEHOLDER_SRC},
    BodyClassUpdate, HeroEffect, LogSink, MenuInput, MenuTransition, Portfolio, RevealEffect,
    RevealKind, ScrollEffect, ScrollMode, ScrollPlan, ScrollTween, SectionGeometry, SiteConfig,
    SubmissionOutcome, Throttle, Timeline,
};
use portfolio_core::{scroll_fx::ResizeEffect, Debounce};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    CssStyleDeclaration, CustomEvent, CustomEventInit, Document, Element, HtmlButtonElement,
    HtmlElement,
    HtmlFormElement, HtmlImageElement, HtmlInputElement, HtmlTextAreaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent,
    ScrollBehavior, ScrollToOptions, Window,
};

/// Delay between opening the deep link and confirming to the visitor (ms).
const SUBMIT_SETTLE_MS: f64 = 1000.0;

/// Submit button content while the handoff is in flight.
const SUBMIT_BUSY_HTML: &str = "<i class=\"fas fa-spinner fa-spin\"></i> Enviando...";

/// Submit button content at rest.
const SUBMIT_IDLE_HTML: &str = "<i class=\"fas fa-paper-plane\"></i> Enviar Mensagem";

/// Elements the reveal observer watches.
const REVEAL_SELECTOR: &str =
    "section, .timeline-item, .galeria-item, .depoimento-card, .stat-item, .contato-item";

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("portfolio WASM initialized");
}

type AppHandle = Rc<RefCell<AppState>>;

/// The queried DOM contract. Every optional handle is a feature toggle.
struct Dom {
    window: Window,
    document: Document,
    body: HtmlElement,
    header: Option<Element>,
    mobile_toggle: Option<Element>,
    nav_container: Option<Element>,
    nav_links: Vec<Element>,
    back_to_top: Option<Element>,
    contact_form: Option<HtmlFormElement>,
    hero_text: Option<Element>,
    hero_image: Option<Element>,
    copy_button: Option<Element>,
    copy_source: Option<Element>,
}

impl Dom {
    fn query(window: Window, document: Document, body: HtmlElement) -> Self {
        let select = |selector: &str| document.query_selector(selector).ok().flatten();
        let nav_links = select_all(&document, ".nav-link");
        Self {
            header: select(".header"),
            mobile_toggle: document.get_element_by_id("mobileToggle"),
            nav_container: document.get_element_by_id("navLinks"),
            nav_links,
            back_to_top: document.get_element_by_id("voltarTopo"),
            contact_form: document
                .get_element_by_id("contatoForm")
                .and_then(|el| el.dyn_into::<HtmlFormElement>().ok()),
            hero_text: select(".hero-text"),
            hero_image: select(".hero-image"),
            copy_button: select(".copy-btn"),
            copy_source: document.get_element_by_id("codigoTexto"),
            window,
            document,
            body,
        }
    }

    fn header_height(&self) -> f64 {
        self.header
            .as_ref()
            .map_or(0.0, |el| el.get_bounding_client_rect().height())
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

struct AppState {
    portfolio: Portfolio,
    dom: Dom,
    reveal_kinds: HashMap<String, RevealKind>,
    reveal_observer: Option<IntersectionObserver>,
    lazy_observer: Option<IntersectionObserver>,
    throttle: Throttle,
    resize_debounce: Debounce,
    torn_down: bool,
}

/// The portfolio application entry point for the browser.
#[wasm_bindgen]
pub struct PortfolioApp {
    state: AppHandle,
}

#[wasm_bindgen]
impl PortfolioApp {
    /// Create the application against the current document.
    ///
    /// `config_json` overrides individual configuration fields; pass
    /// `null`/`undefined` (or an empty string) for the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when there is no window/document/body, or when
    /// the configuration JSON is malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PortfolioApp, JsValue> {
        let config = match config_json.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(json) => {
                SiteConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => SiteConfig::default(),
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("No document body"))?;

        let throttle = Throttle::new(config.throttle_ms);
        let resize_debounce = Debounce::new(config.debounce_ms);
        let mut portfolio = Portfolio::new(config);
        portfolio.set_analytics_sink(Box::new(LogSink));

        let dom = Dom::query(window, document, body);

        Ok(Self {
            state: Rc::new(RefCell::new(AppState {
                portfolio,
                dom,
                reveal_kinds: HashMap::new(),
                reveal_observer: None,
                lazy_observer: None,
                throttle,
                resize_debounce,
                torn_down: false,
            })),
        })
    }

    /// Run one-time startup: classify the device, wire every listener,
    /// play the hero entry, and announce readiness. Repeat calls no-op.
    ///
    /// Wiring failures are logged and skip only their own feature.
    ///
    /// # Errors
    ///
    /// Returns an error only when the application state is unavailable.
    #[allow(clippy::too_many_lines)]
    pub fn start(&self) -> Result<(), JsValue> {
        let (plan, window) = {
            let mut state = self
                .state
                .try_borrow_mut()
                .map_err(|_| JsValue::from_str("Application state is busy"))?;
            let signals = read_signals(&state.dom.window);
            let sections = measure_sections(&state.dom);
            let scroll_y = state.dom.scroll_y();
            let Some(plan) = state.portfolio.startup(&signals, sections, scroll_y) else {
                return Ok(());
            };

            apply_body_classes(&state.dom, &plan.body_classes);
            if let Some(vh) = plan.vh_unit {
                apply_vh_unit(&state.dom, vh);
            }
            let _ = state.dom.body.class_list().remove_1("loading");
            let _ = state.dom.body.class_list().add_1("loaded");
            if let Some(id) = &plan.active_section {
                apply_active_link(&state.dom, id);
            }
            let window = state.dom.window.clone();
            (plan, window)
        };

        let wired: [(&str, Result<(), JsValue>); 10] = [
            ("scroll", wire_scroll(&self.state)),
            ("resize", wire_resize(&self.state)),
            ("orientation", wire_orientation(&self.state)),
            ("visibility", wire_visibility(&self.state)),
            ("menu", wire_menu(&self.state)),
            ("nav links", wire_nav_links(&self.state)),
            ("keyboard", wire_keyboard(&self.state)),
            ("back to top", wire_back_to_top(&self.state)),
            ("contact form", wire_contact_form(&self.state)),
            ("copy", wire_copy(&self.state)),
        ];
        for (feature, result) in wired {
            if let Err(err) = result {
                tracing::warn!(feature, ?err, "feature wiring failed, skipping");
            }
        }

        if plan.classification.is_desktop() {
            if let Err(err) = wire_pointer_effects(&self.state) {
                tracing::warn!(?err, "pointer effect wiring failed, skipping");
            }
        }
        if let Err(err) = setup_reveals(&self.state, plan.use_reveal_observer) {
            tracing::warn!(?err, "reveal wiring failed, marking everything visible");
            reveal_everything_now(&self.state);
        }
        if let Err(err) = setup_lazy_images(&self.state) {
            tracing::warn!(?err, "lazy image wiring failed, skipping");
        }

        let hero_text = self.state.borrow().dom.hero_text.clone();
        let hero_image = self.state.borrow().dom.hero_image.clone();
        play_timeline(&self.state, &window, plan.hero, move |effect: &HeroEffect| {
            let target = match effect {
                HeroEffect::ShowText => &hero_text,
                HeroEffect::ShowImage => &hero_image,
            };
            if let Some(element) = target {
                let _ = element.class_list().add_1("fade-in-up");
            }
        });

        // Hook scripts receive the app itself as the event detail.
        let init = CustomEventInit::new();
        init.set_detail(&JsValue::from(Self {
            state: Rc::clone(&self.state),
        }));
        if let Ok(event) = CustomEvent::new_with_event_init_dict("portfolioLoaded", &init) {
            let _ = window.dispatch_event(&event);
        }
        Ok(())
    }

    /// Disconnect both intersection observers and stop reacting to
    /// events. Timers already scheduled become inert.
    pub fn teardown(&self) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        state.torn_down = true;
        if let Some(observer) = state.reveal_observer.take() {
            observer.disconnect();
        }
        if let Some(observer) = state.lazy_observer.take() {
            observer.disconnect();
        }
        tracing::info!("portfolio app torn down");
    }

    /// Whether startup has run.
    #[wasm_bindgen(js_name = isStarted)]
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state
            .try_borrow()
            .is_ok_and(|s| s.portfolio.is_started())
    }

    /// The current viewport tier (`"mobile"`, `"tablet"`, `"desktop"`).
    #[wasm_bindgen(js_name = deviceTier)]
    #[must_use]
    pub fn device_tier(&self) -> String {
        self.state
            .try_borrow()
            .ok()
            .and_then(|s| s.portfolio.classification())
            .map_or_else(String::new, |c| c.tier.attr_value().to_string())
    }

    /// The full classification as JSON, or `null` before startup.
    #[wasm_bindgen(js_name = classificationJson)]
    #[must_use]
    pub fn classification_json(&self) -> String {
        self.state
            .try_borrow()
            .ok()
            .and_then(|s| s.portfolio.classification())
            .and_then(|c| serde_json::to_string(&c).ok())
            .unwrap_or_else(|| "null".to_string())
    }

    /// Whether the mobile menu is open.
    #[wasm_bindgen(js_name = isMenuOpen)]
    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.state
            .try_borrow()
            .is_ok_and(|s| s.portfolio.menu_is_open())
    }
}

// ============================================================================
// Browser snapshots
// ============================================================================

fn read_signals(window: &Window) -> DeviceSignals {
    let navigator = window.navigator();
    let dimension = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64());
    DeviceSignals {
        viewport_width: dimension(window.inner_width()).unwrap_or(0.0),
        viewport_height: dimension(window.inner_height()).unwrap_or(0.0),
        user_agent: navigator.user_agent().unwrap_or_default(),
        touch_points: u32::try_from(navigator.max_touch_points()).unwrap_or(0),
        touch_events: js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart"))
            .unwrap_or(false),
        prefers_reduced_motion: window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|query| query.matches()),
    }
}

fn measure_sections(dom: &Dom) -> Vec<SectionGeometry> {
    let scroll_y = dom.scroll_y();
    select_all(&dom.document, "section[id]")
        .into_iter()
        .map(|section| {
            let rect = section.get_bounding_client_rect();
            SectionGeometry {
                id: section.id(),
                top: rect.top() + scroll_y,
                height: rect.height(),
            }
        })
        .collect()
}

fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    let mut elements = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        if let Some(element) = list.get(index).and_then(|node| node.dyn_into::<Element>().ok()) {
            elements.push(element);
        }
    }
    elements
}

fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map_or_else(js_sys::Date::now, |perf| perf.now())
}

#[allow(clippy::cast_possible_truncation)]
fn set_timeout(window: &Window, delay_ms: f64, callback: impl FnOnce() + 'static) {
    let closure = Closure::once_into_js(callback);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.unchecked_ref(),
        delay_ms as i32,
    );
}

fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    element.dyn_ref::<HtmlElement>().map(HtmlElement::style)
}

fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(style) = style_of(element) {
        let _ = style.set_property(property, value);
    }
}

/// Drain a core timeline into `setTimeout` callbacks. Effects scheduled
/// here check the teardown flag before touching the document.
fn play_timeline<E: 'static>(
    handle: &AppHandle,
    window: &Window,
    mut timeline: Timeline<E>,
    apply: impl Fn(&E) + Clone + 'static,
) {
    while let Some(delay) = timeline.next_delay() {
        for effect in timeline.drain_due(delay) {
            let guard = Rc::clone(handle);
            let apply = apply.clone();
            set_timeout(window, delay, move || {
                let Ok(state) = guard.try_borrow() else {
                    return;
                };
                if state.torn_down {
                    return;
                }
                drop(state);
                apply(&effect);
            });
        }
    }
}

// ============================================================================
// Effect application
// ============================================================================

fn apply_body_classes(dom: &Dom, update: &BodyClassUpdate) {
    let classes = dom.body.class_list();
    for class in update.remove {
        let _ = classes.remove_1(class);
    }
    for class in &update.add {
        let _ = classes.add_1(class);
    }
    let _ = dom.body.set_attribute("data-viewport", update.viewport_attr);
}

fn apply_vh_unit(dom: &Dom, vh: f64) {
    if let Some(root) = dom.document.document_element() {
        set_style(&root, "--vh", &format!("{vh}px"));
    }
}

fn apply_menu_transition(dom: &Dom, transition: MenuTransition) {
    let open = transition == MenuTransition::Opened;
    if let Some(toggle) = &dom.mobile_toggle {
        let _ = if open {
            toggle.class_list().add_1("active")
        } else {
            toggle.class_list().remove_1("active")
        };
        let _ = toggle.set_attribute("aria-expanded", if open { "true" } else { "false" });
    }
    if let Some(container) = &dom.nav_container {
        let _ = if open {
            container.class_list().add_1("show")
        } else {
            container.class_list().remove_1("show")
        };
        let _ = container.set_attribute("aria-hidden", if open { "false" } else { "true" });
    }
    let _ = dom
        .body
        .style()
        .set_property("overflow", if open { "hidden" } else { "" });
}

fn apply_active_link(dom: &Dom, section_id: &str) {
    for link in &dom.nav_links {
        let _ = link.class_list().remove_1("active");
    }
    if let Ok(Some(active)) = dom
        .document
        .query_selector(&format!("a[href=\"#{section_id}\"]"))
    {
        let _ = active.class_list().add_1("active");
    }
}

fn apply_scroll_effect(dom: &Dom, effect: &ScrollEffect) {
    match effect {
        ScrollEffect::SetHeaderScrolled(scrolled) => {
            if let Some(header) = &dom.header {
                let _ = if *scrolled {
                    header.class_list().add_1("scrolled")
                } else {
                    header.class_list().remove_1("scrolled")
                };
            }
        }
        ScrollEffect::SetHeaderHidden(hidden) => {
            if let Some(header) = &dom.header {
                set_style(
                    header,
                    "transform",
                    if *hidden { "translateY(-100%)" } else { "translateY(0)" },
                );
            }
        }
        ScrollEffect::SetBackToTopVisible(visible) => {
            if let Some(button) = &dom.back_to_top {
                let _ = if *visible {
                    button.class_list().add_1("show")
                } else {
                    button.class_list().remove_1("show")
                };
            }
        }
    }
}

fn apply_resize_effect(dom: &Dom, effect: &ResizeEffect) {
    match effect {
        ResizeEffect::SetVhUnit(vh) => apply_vh_unit(dom, *vh),
        ResizeEffect::ResetHeaderTransform => {
            if let Some(header) = &dom.header {
                set_style(header, "transform", "translateY(0)");
            }
        }
    }
}

fn apply_scroll_plan(dom: &Dom, plan: &ScrollPlan) {
    match plan.mode {
        ScrollMode::Instant => dom.window.scroll_to_with_x_and_y(0.0, plan.target),
        ScrollMode::Smooth => {
            if supports_native_smooth(&dom.document) {
                let options = ScrollToOptions::new();
                options.set_top(plan.target);
                options.set_behavior(ScrollBehavior::Smooth);
                dom.window.scroll_to_with_scroll_to_options(&options);
            } else {
                run_scroll_tween(&dom.window, plan.target);
            }
        }
    }
    if let Some(fragment) = &plan.fragment {
        if let Ok(history) = dom.window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&format!("#{fragment}")));
        }
    }
}

fn supports_native_smooth(document: &Document) -> bool {
    document
        .document_element()
        .and_then(|root| style_of(&root))
        .is_some_and(|style| {
            js_sys::Reflect::has(style.as_ref(), &JsValue::from_str("scrollBehavior"))
                .unwrap_or(false)
        })
}

/// Animation-frame easing loop for browsers without native smooth scroll.
fn run_scroll_tween(window: &Window, target: f64) {
    let tween = ScrollTween::new(window.scroll_y().unwrap_or(0.0), target);
    let win = window.clone();
    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let frame_inner = Rc::clone(&frame);
    let origin = Cell::new(None::<f64>);

    *frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        let first = origin.get().unwrap_or(timestamp);
        origin.set(Some(first));
        let elapsed = timestamp - first;
        win.scroll_to_with_x_and_y(0.0, tween.position_at(elapsed));
        if tween.finished(elapsed) {
            frame_inner.borrow_mut().take();
        } else if let Some(closure) = frame_inner.borrow().as_ref() {
            let _ = win.request_animation_frame(closure.as_ref().unchecked_ref());
        }
    }));

    if let Some(closure) = frame.borrow().as_ref() {
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    };
}

// ============================================================================
// Scroll / resize / visibility wiring
// ============================================================================

fn wire_scroll(handle: &AppHandle) -> Result<(), JsValue> {
    let window = handle.borrow().dom.window.clone();
    let outer = Rc::clone(handle);
    let closure = Closure::<dyn FnMut()>::new(move || {
        let Ok(mut state) = outer.try_borrow_mut() else {
            return;
        };
        if state.torn_down {
            return;
        }
        let now = now_ms(&state.dom.window);
        if !state.throttle.fire(now) || !state.portfolio.request_scroll_frame() {
            return;
        }
        let inner = Rc::clone(&outer);
        let raf = Closure::once_into_js(move |_timestamp: f64| {
            let Ok(mut state) = inner.try_borrow_mut() else {
                return;
            };
            if state.torn_down {
                return;
            }
            let scroll_y = state.dom.scroll_y();
            let plan = state.portfolio.on_scroll_frame(scroll_y);
            if let Some(id) = &plan.active_section {
                apply_active_link(&state.dom, id);
            }
            for effect in &plan.effects {
                apply_scroll_effect(&state.dom, effect);
            }
        });
        let _ = state.dom.window.request_animation_frame(raf.unchecked_ref());
    });
    window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn run_resize_pass(handle: &AppHandle) {
    let Ok(mut state) = handle.try_borrow_mut() else {
        return;
    };
    if state.torn_down {
        return;
    }
    let signals = read_signals(&state.dom.window);
    let sections = measure_sections(&state.dom);
    let plan = state.portfolio.on_resize(&signals, sections);
    apply_body_classes(&state.dom, &plan.body_classes);
    if let Some(transition) = plan.menu {
        apply_menu_transition(&state.dom, transition);
    }
    for effect in &plan.effects {
        apply_resize_effect(&state.dom, effect);
    }
}

fn wire_resize(handle: &AppHandle) -> Result<(), JsValue> {
    let window = handle.borrow().dom.window.clone();
    let outer = Rc::clone(handle);
    let closure = Closure::<dyn FnMut()>::new(move || {
        let (window, delay) = {
            let Ok(mut state) = outer.try_borrow_mut() else {
                return;
            };
            if state.torn_down {
                return;
            }
            let now = now_ms(&state.dom.window);
            state.resize_debounce.poke(now);
            (
                state.dom.window.clone(),
                state.portfolio.config().debounce_ms,
            )
        };
        let inner = Rc::clone(&outer);
        // Slight slack so the check lands after the quiescence boundary.
        set_timeout(&window, delay + 1.0, move || {
            let ready = {
                let Ok(mut state) = inner.try_borrow_mut() else {
                    return;
                };
                if state.torn_down {
                    return;
                }
                let now = now_ms(&state.dom.window);
                state.resize_debounce.ready(now)
            };
            if ready {
                run_resize_pass(&inner);
            }
        });
    });
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_orientation(handle: &AppHandle) -> Result<(), JsValue> {
    let window = handle.borrow().dom.window.clone();
    let outer = Rc::clone(handle);
    let closure = Closure::<dyn FnMut()>::new(move || {
        let Some(window) = ({
            let Ok(state) = outer.try_borrow() else {
                return;
            };
            (!state.torn_down
                && state
                    .portfolio
                    .classification()
                    .is_some_and(|c| c.is_mobile()))
            .then(|| state.dom.window.clone())
        }) else {
            return;
        };
        let inner = Rc::clone(&outer);
        set_timeout(&window, ORIENTATION_SETTLE_MS, move || {
            run_resize_pass(&inner);
        });
    });
    window.add_event_listener_with_callback("orientationchange", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_visibility(handle: &AppHandle) -> Result<(), JsValue> {
    let document = handle.borrow().dom.document.clone();
    let outer = Rc::clone(handle);
    let closure = Closure::<dyn FnMut()>::new(move || {
        let Ok(mut state) = outer.try_borrow_mut() else {
            return;
        };
        if state.torn_down {
            return;
        }
        let hidden = state.dom.document.hidden();
        state.portfolio.on_visibility_change(hidden);
    });
    document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// ============================================================================
// Menu and navigation wiring
// ============================================================================

fn feed_menu_input(handle: &AppHandle, input: MenuInput) {
    let Ok(mut state) = handle.try_borrow_mut() else {
        return;
    };
    if state.torn_down {
        return;
    }
    if let Some(transition) = state.portfolio.menu_input(input) {
        apply_menu_transition(&state.dom, transition);
    }
}

fn wire_menu(handle: &AppHandle) -> Result<(), JsValue> {
    let (toggle, document) = {
        let state = handle.borrow();
        (state.dom.mobile_toggle.clone(), state.dom.document.clone())
    };

    if let Some(toggle) = toggle {
        let outer = Rc::clone(handle);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            // Keep the toggle click from also counting as an outside click.
            event.stop_propagation();
            feed_menu_input(&outer, MenuInput::ToggleActivated);
        });
        toggle.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let outer = Rc::clone(handle);
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let open = outer
            .try_borrow()
            .is_ok_and(|s| !s.torn_down && s.portfolio.menu_is_open());
        if !open {
            return;
        }
        let inside = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("#navLinks, #mobileToggle").ok().flatten())
            .is_some();
        if !inside {
            feed_menu_input(&outer, MenuInput::OutsideClick);
        }
    });
    document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_nav_links(handle: &AppHandle) -> Result<(), JsValue> {
    let links = handle.borrow().dom.nav_links.clone();
    for link in links {
        let Some(id) = link
            .get_attribute("href")
            .as_deref()
            .and_then(|href| href.strip_prefix('#'))
            .filter(|id| !id.is_empty())
            .map(str::to_string)
        else {
            continue;
        };
        let outer = Rc::clone(handle);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let Ok(mut state) = outer.try_borrow_mut() else {
                return;
            };
            if state.torn_down {
                return;
            }
            if let Some(transition) = state.portfolio.menu_input(MenuInput::LinkActivated) {
                apply_menu_transition(&state.dom, transition);
            }
            // Offsets may have shifted since startup; plan against fresh ones.
            let sections = measure_sections(&state.dom);
            state.portfolio.update_sections(sections);
            let header_height = state.dom.header_height();
            if let Some(plan) = state.portfolio.section_plan(&id, header_height) {
                state.portfolio.track("navigation", "click", &id);
                apply_scroll_plan(&state.dom, &plan);
            }
        });
        link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn wire_back_to_top(handle: &AppHandle) -> Result<(), JsValue> {
    let Some(button) = handle.borrow().dom.back_to_top.clone() else {
        return Ok(());
    };
    let outer = Rc::clone(handle);
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        let Ok(state) = outer.try_borrow() else {
            return;
        };
        if state.torn_down {
            return;
        }
        let plan = state.portfolio.back_to_top();
        state.portfolio.track("navigation", "back-to-top", "");
        apply_scroll_plan(&state.dom, &plan);
    });
    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_keyboard(handle: &AppHandle) -> Result<(), JsValue> {
    let document = handle.borrow().dom.document.clone();
    let outer = Rc::clone(handle);
    let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if event.key() == "Escape" {
            feed_menu_input(&outer, MenuInput::EscapeKey);
            return;
        }
        let Ok(state) = outer.try_borrow() else {
            return;
        };
        if state.torn_down {
            return;
        }
        let in_input = state.dom.document.active_element().is_some_and(|el| {
            matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
                || el
                    .dyn_ref::<HtmlElement>()
                    .is_some_and(HtmlElement::is_content_editable)
        });
        if let Some(edge) = shortcut(&event.key(), event.ctrl_key(), in_input) {
            event.prevent_default();
            let target = match edge {
                ScrollEdge::Top => 0.0,
                ScrollEdge::Bottom => f64::from(state.dom.body.scroll_height()),
            };
            apply_scroll_plan(
                &state.dom,
                &ScrollPlan {
                    target,
                    mode: ScrollMode::Smooth,
                    fragment: None,
                },
            );
        }
    });
    document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// ============================================================================
// Reveal wiring
// ============================================================================

fn classify_reveal(element: &Element) -> RevealKind {
    let classes = element.class_list();
    if classes.contains("timeline-item") {
        RevealKind::TimelineEntry
    } else if classes.contains("galeria-item") {
        RevealKind::GalleryEntry {
            sibling_index: sibling_index(element),
        }
    } else if classes.contains("depoimento-card") {
        RevealKind::TestimonialCard {
            sibling_index: sibling_index(element),
        }
    } else if classes.contains("stat-item") {
        let display = element
            .query_selector(".stat-number")
            .ok()
            .flatten()
            .and_then(|n| n.text_content())
            .unwrap_or_default();
        RevealKind::StatCounter { display }
    } else if element.id() == "codigo" {
        let benefit_count = element
            .query_selector_all(".beneficio")
            .map_or(0, |list| list.length() as usize);
        RevealKind::CodeSection { benefit_count }
    } else {
        RevealKind::Container
    }
}

fn sibling_index(element: &Element) -> usize {
    let mut index = 0;
    let mut current = element.previous_element_sibling();
    while let Some(sibling) = current {
        index += 1;
        current = sibling.previous_element_sibling();
    }
    index
}

fn apply_reveal_effect(element: &Element, effect: &RevealEffect) {
    match effect {
        RevealEffect::MarkVisible => {
            let _ = element.class_list().add_1("is-visible");
        }
        RevealEffect::ResetTransform => {
            set_style(element, "opacity", "1");
            set_style(element, "transform", "translateX(0)");
        }
        RevealEffect::LiftIn => {
            set_style(element, "opacity", "1");
            set_style(element, "transform", "translateY(0)");
        }
        RevealEffect::PopIn => {
            set_style(element, "opacity", "1");
            set_style(element, "transform", "scale(1) translateY(0)");
        }
        RevealEffect::SetCounterText(text) => {
            if let Ok(Some(number)) = element.query_selector(".stat-number") {
                number.set_text_content(Some(text));
            }
        }
        RevealEffect::ShowCodeBox => {
            if let Ok(Some(code_box)) = element.query_selector(".codigo-box") {
                set_style(&code_box, "opacity", "1");
                set_style(&code_box, "transform", "scale(1)");
            }
        }
        RevealEffect::ShowBenefit(index) => {
            if let Ok(list) = element.query_selector_all(".beneficio") {
                if let Some(benefit) = u32::try_from(*index)
                    .ok()
                    .and_then(|i| list.get(i))
                    .and_then(|node| node.dyn_into::<Element>().ok())
                {
                    set_style(&benefit, "opacity", "1");
                    set_style(&benefit, "transform", "translateX(0)");
                }
            }
        }
    }
}

fn observer_supported(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

fn setup_reveals(handle: &AppHandle, use_observer: bool) -> Result<(), JsValue> {
    let (document, window, thresholds, root_margin) = {
        let state = handle.borrow();
        let config = state.portfolio.config();
        (
            state.dom.document.clone(),
            state.dom.window.clone(),
            config.observer_thresholds.clone(),
            config.observer_root_margin.clone(),
        )
    };

    let elements = select_all(&document, REVEAL_SELECTOR);
    let mut keyed = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let _ = element.class_list().add_1("animate-on-scroll");
        let key = if element.id().is_empty() {
            format!("reveal-{index}")
        } else {
            element.id()
        };
        element.set_attribute("data-reveal-key", &key)?;
        let kind = classify_reveal(&element);
        handle.borrow_mut().reveal_kinds.insert(key.clone(), kind);
        keyed.push((key, element));
    }

    if use_observer && observer_supported(&window) {
        let threshold_array: js_sys::Array = thresholds
            .iter()
            .copied()
            .map(JsValue::from_f64)
            .collect();
        let init = IntersectionObserverInit::new();
        init.set_threshold(&threshold_array);
        init.set_root_margin(&root_margin);

        let outer = Rc::clone(handle);
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                let Some(key) = target.get_attribute("data-reveal-key") else {
                    continue;
                };
                let (timeline, window) = {
                    let Ok(mut state) = outer.try_borrow_mut() else {
                        continue;
                    };
                    if state.torn_down {
                        return;
                    }
                    let Some(kind) = state.reveal_kinds.get(&key).cloned() else {
                        continue;
                    };
                    let window = state.dom.window.clone();
                    (
                        state
                            .portfolio
                            .observe_reveal(&key, entry.intersection_ratio(), &kind),
                        window,
                    )
                };
                if let Some(timeline) = timeline {
                    let element = target.clone();
                    play_timeline(&outer, &window, timeline, move |effect: &RevealEffect| {
                        apply_reveal_effect(&element, effect);
                    });
                }
            }
        });
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        for (_, element) in &keyed {
            observer.observe(element);
        }
        callback.forget();
        handle.borrow_mut().reveal_observer = Some(observer);
    } else {
        // Correctness fallback: content must become visible regardless.
        let mut state = handle.borrow_mut();
        state
            .portfolio
            .reveal_all_eagerly(keyed.iter().map(|(key, _)| key.clone()));
        for (_, element) in &keyed {
            let _ = element.class_list().add_1("is-visible");
        }
    }
    Ok(())
}

fn reveal_everything_now(handle: &AppHandle) {
    let Ok(state) = handle.try_borrow() else {
        return;
    };
    for element in select_all(&state.dom.document, REVEAL_SELECTOR) {
        let _ = element.class_list().add_1("is-visible");
    }
}

// ============================================================================
// Lazy image wiring
// ============================================================================

fn setup_lazy_images(handle: &AppHandle) -> Result<(), JsValue> {
    let (document, window, margin_px) = {
        let state = handle.borrow();
        (
            state.dom.document.clone(),
            state.dom.window.clone(),
            state.portfolio.config().lazy_margin_px,
        )
    };

    // Anything with an already-resolved source is shown immediately.
    for element in select_all(&document, "img") {
        if let Some(img) = element.dyn_ref::<HtmlImageElement>() {
            let src = img.src();
            if src.contains("http") || src.contains("imagens/") {
                set_style(&element, "opacity", "1");
                let _ = element.class_list().add_1("loaded");
            }
        }
    }

    let supported = observer_supported(&window);
    let observer = if supported {
        let init = IntersectionObserverInit::new();
        init.set_root_margin(&format!("{margin_px}px"));
        init.set_threshold(&JsValue::from_f64(0.1));

        let outer = Rc::clone(handle);
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    let Some(key) = target.get_attribute("data-lazy-key") else {
                        continue;
                    };
                    let src = {
                        let Ok(mut state) = outer.try_borrow_mut() else {
                            continue;
                        };
                        if state.torn_down {
                            return;
                        }
                        state.portfolio.lazy_images().on_intersect(&key)
                    };
                    if let Some(src) = src {
                        if let Some(img) = target.dyn_ref::<HtmlImageElement>() {
                            img.set_src(&src);
                        }
                        observer.unobserve(&target);
                    }
                }
            },
        );
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        callback.forget();
        Some(observer)
    } else {
        None
    };

    for (index, element) in select_all(&document, "img[loading=\"lazy\"]")
        .into_iter()
        .enumerate()
    {
        let Some(img) = element.dyn_ref::<HtmlImageElement>().cloned() else {
            continue;
        };
        let key = format!("lazy-{index}");
        element.set_attribute("data-lazy-key", &key)?;

        let src = img.src();
        let resolved = (!src.is_empty()).then_some(src);
        let deferred = element.get_attribute("data-src");
        let image = LazyImage::from_attributes(resolved.as_deref(), deferred.as_deref());
        let pending = image.state() == portfolio_core::ImageState::Pending;
        handle.borrow_mut().portfolio.lazy_images().insert(key.clone(), image);

        if pending {
            if let Some(observer) = &observer {
                img.set_src(PLACEHOLDER_SRC);
                wire_image_outcome(handle, &img, &key)?;
                observer.observe(&element);
            } else {
                // No observation available: eager load, not deferred. The
                // outcome listeners still settle the registry entry.
                wire_image_outcome(handle, &img, &key)?;
                let src = handle
                    .borrow_mut()
                    .portfolio
                    .lazy_images()
                    .on_intersect(&key);
                if let Some(src) = src {
                    img.set_src(&src);
                }
                set_style(&element, "opacity", "1");
            }
        } else {
            let _ = element.class_list().add_1("loaded");
        }
    }

    handle.borrow_mut().lazy_observer = observer;
    Ok(())
}

fn wire_image_outcome(handle: &AppHandle, img: &HtmlImageElement, key: &str) -> Result<(), JsValue> {
    let loaded = {
        let outer = Rc::clone(handle);
        let key = key.to_string();
        let element = img.clone();
        Closure::<dyn FnMut()>::new(move || {
            let Ok(mut state) = outer.try_borrow_mut() else {
                return;
            };
            if state.torn_down {
                return;
            }
            state.portfolio.lazy_images().mark_loaded(&key);
            let _ = element.class_list().add_1("loaded");
            let _ = element.style().set_property("opacity", "1");
            // The real image replacing the placeholder moves every offset
            // below it.
            let sections = measure_sections(&state.dom);
            state.portfolio.update_sections(sections);
        })
    };
    img.add_event_listener_with_callback("load", loaded.as_ref().unchecked_ref())?;
    loaded.forget();

    let errored = {
        let outer = Rc::clone(handle);
        let key = key.to_string();
        let element = img.clone();
        Closure::<dyn FnMut()>::new(move || {
            let Ok(mut state) = outer.try_borrow_mut() else {
                return;
            };
            if state.torn_down {
                return;
            }
            state.portfolio.lazy_images().mark_errored(&key);
            let _ = element.class_list().add_1("error");
            let _ = element
                .style()
                .set_property("opacity", &ERRORED_OPACITY.to_string());
        })
    };
    img.add_event_listener_with_callback("error", errored.as_ref().unchecked_ref())?;
    errored.forget();
    Ok(())
}

// ============================================================================
// Contact form wiring
// ============================================================================

fn field_value(document: &Document, field: Field) -> String {
    document
        .get_element_by_id(field.dom_id())
        .map_or_else(String::new, |element| {
            if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
                input.value()
            } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
                area.value()
            } else {
                String::new()
            }
        })
}

fn read_submission(document: &Document) -> Submission {
    Submission {
        name: field_value(document, Field::Name),
        email: field_value(document, Field::Email),
        phone: field_value(document, Field::Phone),
        message: field_value(document, Field::Message),
    }
}

fn show_field_error(document: &Document, error: &FieldError) {
    let Some(field) = document.get_element_by_id(error.field.dom_id()) else {
        return;
    };
    let _ = field.class_list().add_1("error");
    let Some(parent) = field.parent_element() else {
        return;
    };
    if let Ok(Some(existing)) = parent.query_selector(".error-message") {
        existing.remove();
    }
    if let Ok(span) = document.create_element("span") {
        let _ = span.class_list().add_1("error-message");
        span.set_text_content(Some(error.message));
        let _ = parent.append_child(&span);
    }
}

fn clear_field_error(document: &Document, field: Field) {
    let Some(element) = document.get_element_by_id(field.dom_id()) else {
        return;
    };
    let _ = element.class_list().remove_1("error");
    if let Some(parent) = element.parent_element() {
        if let Ok(Some(message)) = parent.query_selector(".error-message") {
            message.remove();
        }
    }
}

fn show_form_notice(handle: &AppHandle, notice: FormNotice) {
    let Ok(state) = handle.try_borrow() else {
        return;
    };
    let Some(form) = &state.dom.contact_form else {
        return;
    };
    if let Ok(Some(existing)) = form.query_selector(".form-message") {
        existing.remove();
    }
    let Ok(element) = state.dom.document.create_element("div") else {
        return;
    };
    element.set_class_name(&format!(
        "form-message {}",
        if notice.is_success() { "success" } else { "error" }
    ));
    element.set_text_content(Some(notice.message()));
    let _ = form.append_child(&element);

    set_timeout(&state.dom.window, contact::NOTICE_DISMISS_MS, move || {
        element.remove();
    });
}

fn set_submit_busy(form: &HtmlFormElement, busy: bool) {
    let Ok(Some(button)) = form.query_selector("button[type=\"submit\"]") else {
        return;
    };
    if let Some(button) = button.dyn_ref::<HtmlButtonElement>() {
        button.set_disabled(busy);
        button.set_inner_html(if busy { SUBMIT_BUSY_HTML } else { SUBMIT_IDLE_HTML });
    }
}

fn wire_contact_form(handle: &AppHandle) -> Result<(), JsValue> {
    let (Some(form), document) = ({
        let state = handle.borrow();
        (state.dom.contact_form.clone(), state.dom.document.clone())
    }) else {
        return Ok(());
    };

    let outer = Rc::clone(handle);
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        handle_submit(&outer);
    });
    form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
    closure.forget();

    // Blur validates with the short inline messages; any edit clears the
    // field's error immediately without re-validating.
    for field in [Field::Name, Field::Email, Field::Phone, Field::Message] {
        let Some(element) = document.get_element_by_id(field.dom_id()) else {
            continue;
        };

        let blur_document = document.clone();
        let blur = Closure::<dyn FnMut()>::new(move || {
            let value = field_value(&blur_document, field);
            match contact::validate_field(field, &value) {
                Some(error) => show_field_error(&blur_document, &error),
                None => clear_field_error(&blur_document, field),
            }
        });
        element.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
        blur.forget();

        let input_document = document.clone();
        let input = Closure::<dyn FnMut()>::new(move || {
            clear_field_error(&input_document, field);
        });
        element.add_event_listener_with_callback("input", input.as_ref().unchecked_ref())?;
        input.forget();
    }
    Ok(())
}

fn handle_submit(handle: &AppHandle) {
    let outcome = {
        let Ok(state) = handle.try_borrow() else {
            return;
        };
        if state.torn_down {
            return;
        }
        for field in [Field::Name, Field::Email, Field::Phone, Field::Message] {
            clear_field_error(&state.dom.document, field);
        }
        let submission = read_submission(&state.dom.document);
        state.portfolio.handle_submission(&submission)
    };

    match outcome {
        Ok(SubmissionOutcome::Accepted { link, notice }) => {
            let (window, form) = {
                let Ok(state) = handle.try_borrow() else {
                    return;
                };
                state.portfolio.track("form", "submit", "contato");
                (state.dom.window.clone(), state.dom.contact_form.clone())
            };
            let Some(form) = form else {
                return;
            };
            set_submit_busy(&form, true);

            let opened = matches!(
                window.open_with_url_and_target_and_features(
                    link.as_str(),
                    "_blank",
                    "noopener,noreferrer",
                ),
                Ok(Some(_))
            );
            if opened {
                let settle_handle = Rc::clone(handle);
                let settle_form = form.clone();
                set_timeout(&window, SUBMIT_SETTLE_MS, move || {
                    if settle_handle.try_borrow().is_ok_and(|s| !s.torn_down) {
                        show_form_notice(&settle_handle, notice);
                        settle_form.reset();
                        set_submit_busy(&settle_form, false);
                    }
                });
            } else {
                tracing::warn!("deep link open was blocked");
                show_form_notice(handle, FormNotice::OpenFailed);
                set_submit_busy(&form, false);
            }
        }
        Ok(SubmissionOutcome::Rejected { errors, notice, focus }) => {
            let Ok(state) = handle.try_borrow() else {
                return;
            };
            for error in &errors {
                show_field_error(&state.dom.document, error);
            }
            if let Some(field) = focus {
                if let Some(element) = state.dom.document.get_element_by_id(field.dom_id()) {
                    if let Some(html) = element.dyn_ref::<HtmlElement>() {
                        let _ = html.focus();
                    }
                }
            }
            drop(state);
            show_form_notice(handle, notice);
        }
        Err(err) => {
            tracing::error!(%err, "submission failed");
            show_form_notice(handle, FormNotice::OpenFailed);
        }
    }
}

// ============================================================================
// Copy-to-clipboard wiring
// ============================================================================

fn wire_copy(handle: &AppHandle) -> Result<(), JsValue> {
    let (button, source) = {
        let state = handle.borrow();
        (state.dom.copy_button.clone(), state.dom.copy_source.clone())
    };
    let (Some(button), Some(source)) = (button, source) else {
        return Ok(());
    };

    let outer = Rc::clone(handle);
    let listener_button = button.clone();
    let closure = Closure::<dyn FnMut()>::new(move || {
        let (window, feedback) = {
            let Ok(state) = outer.try_borrow() else {
                return;
            };
            if state.torn_down {
                return;
            }
            state.portfolio.track("interaction", "copy", "codigo");
            (state.dom.window.clone(), state.portfolio.copy_feedback())
        };
        let text = source.text_content().unwrap_or_default();

        let clipboard = window.navigator().clipboard();
        if clipboard.is_undefined() {
            if legacy_copy(&window, &text) {
                show_copy_feedback(&outer, &listener_button, feedback);
            }
            return;
        }

        let async_handle = Rc::clone(&outer);
        let async_button = listener_button.clone();
        let async_window = window.clone();
        spawn_local(async move {
            let copied = match JsFuture::from(clipboard.write_text(&text)).await {
                Ok(_) => true,
                Err(_) => legacy_copy(&async_window, &text),
            };
            if copied {
                show_copy_feedback(&async_handle, &async_button, feedback);
            }
        });
    });
    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Hidden-textarea select+copy path for browsers without the clipboard
/// API.
fn legacy_copy(window: &Window, text: &str) -> bool {
    let Some(document) = window.document() else {
        return false;
    };
    let Some(body) = document.body() else {
        return false;
    };
    let Ok(Some(area)) = document
        .create_element("textarea")
        .map(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
    else {
        return false;
    };
    area.set_value(text);
    let _ = area
        .style()
        .set_css_text("position:fixed;left:-9999px;top:-9999px;opacity:0;");
    let _ = body.append_child(&area);
    let _ = area.focus();
    area.select();
    #[allow(deprecated)]
    let copied = document
        .dyn_ref::<web_sys::HtmlDocument>()
        .and_then(|doc| doc.exec_command("copy").ok())
        .unwrap_or(false);
    area.remove();
    copied
}

fn show_copy_feedback(handle: &AppHandle, button: &Element, feedback: CopyFeedback) {
    let Ok(state) = handle.try_borrow() else {
        return;
    };
    if state.torn_down {
        return;
    }
    let window = state.dom.window.clone();
    let document = state.dom.document.clone();
    let body = state.dom.body.clone();
    drop(state);

    let original = button.inner_html();
    button.set_inner_html("<i class=\"fas fa-check\"></i>");
    set_style(button, "background", "rgba(46, 204, 113, 0.3)");

    let toast = document.create_element("div").ok().map(|toast| {
        toast.set_class_name("copy-toast");
        toast.set_text_content(Some("Código copiado!"));
        let _ = body.append_child(&toast);
        toast
    });

    if let Some(pulse_ms) = feedback.haptic_ms {
        let _ = window.navigator().vibrate_with_duration(pulse_ms);
    }

    let guard = Rc::clone(handle);
    let button = button.clone();
    set_timeout(&window, feedback.dismiss_ms, move || {
        if let Some(toast) = &toast {
            toast.remove();
        }
        if guard.try_borrow().is_ok_and(|s| !s.torn_down) {
            button.set_inner_html(&original);
            set_style(&button, "background", "");
        }
    });
}

// ============================================================================
// Pointer effects (desktop only, purely cosmetic)
// ============================================================================

fn wire_pointer_effects(handle: &AppHandle) -> Result<(), JsValue> {
    let (document, window, hero_image) = {
        let state = handle.borrow();
        (
            state.dom.document.clone(),
            state.dom.window.clone(),
            state.dom.hero_image.clone(),
        )
    };

    if let Some(hero) = hero_image {
        if let Ok(Some(image)) = hero.query_selector("img") {
            let rest_image = image.clone();
            let rest = Closure::<dyn FnMut()>::new(move || {
                set_style(&rest_image, "transform", "translate(0, 0)");
            });
            document.add_event_listener_with_callback("mouseleave", rest.as_ref().unchecked_ref())?;
            rest.forget();

            let parallax_window = window.clone();
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let width = parallax_window
                    .inner_width()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(1.0);
                let height = parallax_window
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(1.0);
                let (x, y) = hero_parallax(
                    f64::from(event.client_x()),
                    f64::from(event.client_y()),
                    width,
                    height,
                );
                set_style(&image, "transform", &format!("translate({x}px, {y}px)"));
            });
            document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
    }

    for card in select_all(&document, ".depoimento-card, .galeria-item") {
        let tilt_card = card.clone();
        let tilt = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let rect = tilt_card.get_bounding_client_rect();
            let (rotate_x, rotate_y) = card_tilt(
                f64::from(event.client_x()),
                f64::from(event.client_y()),
                portfolio_core::timing::Rect {
                    top: rect.top(),
                    left: rect.left(),
                    bottom: rect.bottom(),
                    right: rect.right(),
                },
            );
            set_style(
                &tilt_card,
                "transform",
                &format!("perspective(1000px) rotateX({rotate_x}deg) rotateY({rotate_y}deg)"),
            );
        });
        card.add_event_listener_with_callback("mousemove", tilt.as_ref().unchecked_ref())?;
        tilt.forget();

        let leave_card = card.clone();
        let leave = Closure::<dyn FnMut()>::new(move || {
            set_style(&leave_card, "transform", "");
        });
        card.add_event_listener_with_callback("mouseleave", leave.as_ref().unchecked_ref())?;
        leave.forget();
    }
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn install_fixture(html: &str) -> Element {
        let host = document().create_element("div").unwrap();
        host.set_inner_html(html);
        document().body().unwrap().append_child(&host).unwrap();
        host
    }

    #[wasm_bindgen_test]
    fn ready_event_detail_is_the_app() {
        let window = web_sys::window().unwrap();
        let captured = Rc::new(RefCell::new(JsValue::UNDEFINED));
        let sink = Rc::clone(&captured);
        let listener = Closure::<dyn FnMut(CustomEvent)>::new(move |event: CustomEvent| {
            *sink.borrow_mut() = event.detail();
        });
        window
            .add_event_listener_with_callback("portfolioLoaded", listener.as_ref().unchecked_ref())
            .unwrap();
        listener.forget();

        let app = PortfolioApp::new(None).unwrap();
        app.start().unwrap();

        let detail = captured.borrow().clone();
        assert!(!detail.is_undefined());
        assert!(!detail.is_null());
        // Hook scripts can reach the exported surface through the detail.
        assert!(js_sys::Reflect::has(&detail, &JsValue::from_str("isStarted")).unwrap());
    }

    #[wasm_bindgen_test]
    fn hero_parallax_rests_when_the_pointer_leaves() {
        let host = install_fixture("<div class=\"hero-image\"><img alt=\"\"></div>");
        let app = PortfolioApp::new(None).unwrap();
        wire_pointer_effects(&app.state).unwrap();

        let image = host.query_selector("img").unwrap().unwrap();
        set_style(&image, "transform", "translate(7px, 9px)");

        let leave = web_sys::Event::new("mouseleave").unwrap();
        document().dispatch_event(&leave).unwrap();

        let transform = style_of(&image)
            .unwrap()
            .get_property_value("transform")
            .unwrap();
        assert_eq!(transform, "translate(0, 0)");
        host.remove();
    }

    // Deletes the observer global from the page; keep this test last.
    #[wasm_bindgen_test]
    fn lazy_fallback_settles_outcomes_without_an_observer() {
        let window = web_sys::window().unwrap();
        let _ = js_sys::Reflect::delete_property(
            &window,
            &JsValue::from_str("IntersectionObserver"),
        );

        let host =
            install_fixture("<img loading=\"lazy\" data-src=\"imagens/galeria-01.jpg\" alt=\"\">");
        let app = PortfolioApp::new(None).unwrap();
        setup_lazy_images(&app.state).unwrap();

        let image = host.query_selector("img").unwrap().unwrap();
        assert!(image
            .get_attribute("src")
            .unwrap_or_default()
            .contains("imagens/galeria-01.jpg"));

        // A failed fetch styles the slot instead of leaving it pending.
        let errored = web_sys::Event::new("error").unwrap();
        image.dispatch_event(&errored).unwrap();
        assert!(image.class_list().contains("error"));
        host.remove();
    }
}
