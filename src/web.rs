#![cfg(not(tarpaulin_include))]

//! Browser bindings: the DOM surface, `window.location`/`history` access,
//! `gloo-timers` timeouts and the JS entry points.

use crate::config::SheetConfig;
use crate::location::Location;
use crate::render::{GridNode, Surface};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::sync::{SheetEvent, SyncController};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, HtmlInputElement, Window,
};

type BrowserSheet = SyncController<DomSurface, BrowserLocation, BrowserScheduler>;

thread_local! {
    // Keeps the sheet alive for the lifetime of the page; listeners only hold weak refs.
    static SHEET: RefCell<Option<Rc<RefCell<BrowserSheet>>>> = const { RefCell::new(None) };
}

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[hashsheet] {}", record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

fn init_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

/// The sheet container element on the page.
pub struct DomSurface {
    document: Document,
    container: Element,
}

impl DomSurface {
    /// Look up the container by id. `None` when the page has no such element.
    pub fn find(document: &Document, id: &str) -> Option<Self> {
        document.get_element_by_id(id).map(|container| DomSurface {
            document: document.clone(),
            container,
        })
    }

    pub fn container(&self) -> &Element {
        &self.container
    }

    fn div(&self, class: &str) -> Result<Element, JsValue> {
        let div = self.document.create_element("div")?;
        div.set_class_name(class);
        Ok(div)
    }

    fn build(&self, node: &GridNode) -> Result<Element, JsValue> {
        match node {
            GridNode::Corner => self.div("corner-cell"),
            GridNode::ColumnHeader(_) | GridNode::RowHeader(_) => {
                let header = self.div("header-cell")?;
                header.set_text_content(node.label().as_deref());
                Ok(header)
            }
            GridNode::Input { address, value } => {
                let cell = self.div("cell")?;
                let input = self
                    .document
                    .create_element("input")?
                    .dyn_into::<HtmlInputElement>()
                    .map_err(JsValue::from)?;
                input.set_type("text");
                input.set_attribute("data-row", &address.row().to_string())?;
                input.set_attribute("data-col", &address.col().to_string())?;
                input.set_value(value);
                input.set_attribute("aria-label", &address.aria_label())?;
                cell.append_child(&input)?;
                Ok(cell)
            }
        }
    }
}

impl Surface for DomSurface {
    fn clear(&mut self) {
        self.container.set_inner_html("");
    }

    fn append(&mut self, node: GridNode) {
        let appended = self
            .build(&node)
            .and_then(|element| self.container.append_child(&element).map(|_| ()));
        if let Err(err) = appended {
            log::error!("Failed to render {:?}: {:?}", node, err);
        }
    }
}

/// `window.location` plus `window.history`.
pub struct BrowserLocation {
    window: Window,
}

impl BrowserLocation {
    pub fn new(window: Window) -> Self {
        BrowserLocation { window }
    }
}

impl Location for BrowserLocation {
    fn hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn supports_replace(&self) -> bool {
        self.window
            .history()
            .ok()
            .and_then(|history| js_sys::Reflect::has(&history, &JsValue::from_str("replaceState")).ok())
            .unwrap_or(false)
    }

    fn replace_hash(&mut self, hash: &str) {
        let replaced = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(hash)));
        if let Err(err) = replaced {
            log::error!("history.replaceState failed: {:?}", err);
        }
    }

    fn assign_hash(&mut self, hash: &str) {
        if let Err(err) = self.window.location().set_hash(hash) {
            log::error!("Setting location.hash failed: {:?}", err);
        }
    }
}

/// `setTimeout`-backed timers that report back to the sheet.
///
/// The sheet never needs more than one timer, so only the latest one is held.
/// Dropping a `Timeout` clears it, which is how both `cancel` and a new
/// `schedule` supersede the previous timer.
pub struct BrowserScheduler {
    sheet: Weak<RefCell<BrowserSheet>>,
    next_id: u32,
    pending: Option<(TimerHandle, Timeout)>,
}

impl BrowserScheduler {
    fn new(sheet: Weak<RefCell<BrowserSheet>>) -> Self {
        BrowserScheduler {
            sheet,
            next_id: 0,
            pending: None,
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle(self.next_id);

        let sheet = self.sheet.clone();
        let timeout = Timeout::new(delay_ms, move || {
            dispatch(&sheet, SheetEvent::TimerFired(handle));
        });
        // A fired timer is only dropped here or in `cancel`, never inside its own callback.
        self.pending = Some((handle, timeout));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.pending.as_ref().is_some_and(|(current, _)| *current == handle) {
            self.pending = None;
        }
    }
}

fn dispatch(sheet: &Weak<RefCell<BrowserSheet>>, event: SheetEvent) {
    let Some(sheet) = sheet.upgrade() else {
        return;
    };
    match sheet.try_borrow_mut() {
        Ok(mut sheet) => sheet.dispatch(event),
        Err(_) => log::warn!("Sheet is busy, dropping {:?}", event),
    };
}

fn to_js_error(msg: &str) -> JsValue {
    JsValue::from_str(msg)
}

/// Start the sheet with default settings once the document is ready.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    start_with_config(JsValue::UNDEFINED)
}

/// Start the sheet with a partial `SheetConfig` object, e.g. `{ debounce_ms: 500 }`.
#[wasm_bindgen(js_name = "startWithConfig")]
pub fn start_with_config(config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    init_logging();

    let config: SheetConfig = if config.is_undefined() || config.is_null() {
        SheetConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(|err| to_js_error(&err.to_string()))?
    };

    let window = web_sys::window().ok_or_else(|| to_js_error("no global `window` exists"))?;
    let document = window
        .document()
        .ok_or_else(|| to_js_error("window has no document"))?;

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || {
            if let Err(err) = mount(config) {
                log::error!("Failed to start sheet: {:?}", err);
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        document.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            on_ready.unchecked_ref(),
            &options,
        )?;
        Ok(())
    } else {
        mount(config)
    }
}

/// Current value of a cell by name (`"C4"`), or `undefined` before the sheet starts.
#[wasm_bindgen(js_name = "cellValue")]
pub fn cell_value(name: &str) -> Result<Option<String>, JsValue> {
    SHEET.with(|slot| {
        let Some(sheet) = slot.borrow().as_ref().map(Rc::clone) else {
            return Ok(None);
        };
        let sheet = sheet
            .try_borrow()
            .map_err(|_| to_js_error("sheet is busy"))?;
        sheet
            .cell_value(name)
            .map(|value| Some(value.to_string()))
            .map_err(|err| to_js_error(&err.to_string()))
    })
}

fn mount(config: SheetConfig) -> Result<(), JsValue> {
    if SHEET.with(|slot| slot.borrow().is_some()) {
        log::warn!("Sheet already started");
        return Ok(());
    }

    let window = web_sys::window().ok_or_else(|| to_js_error("no global `window` exists"))?;
    let document = window
        .document()
        .ok_or_else(|| to_js_error("window has no document"))?;

    let surface = DomSurface::find(&document, &config.container_id);
    if surface.is_none() {
        log::warn!("No element with id '{}', nothing to render into", config.container_id);
    }
    let container = surface.as_ref().map(|s| s.container().clone());
    let location = BrowserLocation::new(window.clone());

    let sheet = Rc::new_cyclic(|weak| {
        let scheduler = BrowserScheduler::new(weak.clone());
        RefCell::new(SyncController::start(config, surface, location, scheduler))
    });

    if let Some(container) = container {
        let weak = Rc::downgrade(&sheet);
        let on_input = Closure::wrap(Box::new(move |event: Event| {
            let Some(input) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            dispatch(
                &weak,
                SheetEvent::Input {
                    row: input.get_attribute("data-row"),
                    col: input.get_attribute("data-col"),
                    value: input.value(),
                },
            );
        }) as Box<dyn FnMut(Event)>);
        container.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
    }

    let weak = Rc::downgrade(&sheet);
    let on_hash_change = Closure::wrap(Box::new(move || {
        dispatch(&weak, SheetEvent::HashChanged);
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("hashchange", on_hash_change.as_ref().unchecked_ref())?;
    on_hash_change.forget();

    // Don't lose an edit that is still waiting for its debounce timer.
    let weak = Rc::downgrade(&sheet);
    let on_page_hide = Closure::wrap(Box::new(move || {
        if let Some(sheet) = weak.upgrade() {
            if let Ok(mut sheet) = sheet.try_borrow_mut() {
                if sheet.has_pending_write() {
                    sheet.flush();
                }
            }
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("pagehide", on_page_hide.as_ref().unchecked_ref())?;
    on_page_hide.forget();

    SHEET.with(|slot| *slot.borrow_mut() = Some(sheet));
    log::info!("Sheet started");
    Ok(())
}
