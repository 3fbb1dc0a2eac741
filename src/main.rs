//! Tally entry point
//!
//! Web: mounts the counter into `#counter-app` and runs the render loop.
//! Native: reads key chords from stdin and drives the same keyboard dispatch.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element};

    use tally::persistence::LocalStorage;
    use tally::platform::{BrowserScheduler, WindowKeyboard};
    use tally::view::ViewSnapshot;
    use tally::{Counter, CounterConfig, CounterView};

    const MARKUP: &str = r#"
        <div id="counter-container" class="counter-container" role="group" aria-label="Counter controls">
            <output id="counter-display" class="counter-display" aria-live="polite"></output>
            <div class="counter-controls" role="group" aria-label="Counter buttons">
                <button id="counter-decrement" type="button">&minus;</button>
                <button id="counter-increment" type="button">+</button>
                <button id="counter-reset" type="button">Reset</button>
            </div>
        </div>
    "#;

    /// DOM handles for one mounted counter
    struct Widget {
        view: CounterView,
        container: Element,
        display: Element,
        decrement: Element,
        increment: Element,
        reset: Element,
        // Last frame drawn, so unchanged frames touch nothing
        drawn: Option<ViewSnapshot>,
    }

    impl Widget {
        fn mount(document: &Document, root: &Element, view: CounterView) -> Option<Self> {
            root.set_inner_html(MARKUP);
            Some(Self {
                view,
                container: document.get_element_by_id("counter-container")?,
                display: document.get_element_by_id("counter-display")?,
                decrement: document.get_element_by_id("counter-decrement")?,
                increment: document.get_element_by_id("counter-increment")?,
                reset: document.get_element_by_id("counter-reset")?,
                drawn: None,
            })
        }

        /// Sync DOM with the counter
        fn render(&mut self) {
            let snap = self.view.snapshot();
            if self.drawn.as_ref() == Some(&snap) {
                return;
            }

            self.display.set_text_content(Some(&snap.value.to_string()));
            let _ = self.container.set_attribute("class", snap.container_class());
            for (name, value) in snap.aria.attributes() {
                let _ = self.container.set_attribute(name, &value);
            }

            for (el, button) in [
                (&self.decrement, &snap.decrement),
                (&self.increment, &snap.increment),
                (&self.reset, &snap.reset),
            ] {
                let _ = el.set_attribute("aria-label", &button.aria_label);
                let _ = el.set_attribute("title", button.label);
                if button.disabled {
                    let _ = el.set_attribute("disabled", "");
                } else {
                    let _ = el.remove_attribute("disabled");
                }
            }

            self.drawn = Some(snap);
        }
    }

    /// Read `data-config` from the mount element, falling back to defaults
    fn load_config(root: &Element) -> CounterConfig {
        let Some(json) = root.get_attribute("data-config") else {
            return CounterConfig::default();
        };
        match CounterConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{} - using default configuration", e);
                CounterConfig::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Tally starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - nothing to mount");
            return;
        };
        let Some(root) = document.get_element_by_id("counter-app") else {
            log::error!("No #counter-app element - nothing to mount");
            return;
        };

        let config = load_config(&root);
        let counter = match Counter::with_store(config, Box::new(LocalStorage::open())) {
            Ok(counter) => counter.with_scheduler(Rc::new(BrowserScheduler)),
            Err(e) => {
                log::error!("Failed to create counter: {}", e);
                return;
            }
        };
        let counter = Rc::new(RefCell::new(counter));

        // Page chrome shows the same shared instance
        {
            let total = document.get_element_by_id("app-count");
            if let Some(el) = &total {
                el.set_text_content(Some(&counter.borrow().value().to_string()));
            }
            counter.borrow_mut().on_change(move |value| {
                log::debug!("Count changed: {}", value);
                if let Some(el) = &total {
                    el.set_text_content(Some(&value.to_string()));
                }
            });
        }

        let mut view = CounterView::new(counter.clone());
        view.activate(&WindowKeyboard);

        let Some(widget) = Widget::mount(&document, &root, view) else {
            log::error!("Counter markup missing after mount");
            return;
        };
        let widget = Rc::new(RefCell::new(widget));

        setup_buttons(widget.clone());
        setup_lifecycle(&document, widget.clone());

        widget.borrow_mut().render();
        request_animation_frame(widget);

        log::info!("Tally mounted (value {})", counter.borrow().value());
    }

    fn on_click(el: &Element, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(widget: Rc<RefCell<Widget>>) {
        let w = widget.borrow();
        let counter = w.view.counter().clone();

        {
            let counter = counter.clone();
            on_click(&w.decrement, move |_event| {
                counter.borrow_mut().decrement();
            });
        }
        {
            let counter = counter.clone();
            on_click(&w.increment, move |_event| {
                counter.borrow_mut().increment();
            });
        }
        on_click(&w.reset, move |_event| {
            counter.borrow_mut().reset();
        });
    }

    /// Keyboard dispatch follows page visibility; pagehide tears it down
    fn setup_lifecycle(document: &Document, widget: Rc<RefCell<Widget>>) {
        {
            let widget = widget.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut w = widget.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    w.view.deactivate();
                } else {
                    w.view.activate(&WindowKeyboard);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                widget.borrow_mut().view.deactivate();
            });
            let _ =
                window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(widget: Rc<RefCell<Widget>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            render_loop(widget);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn render_loop(widget: Rc<RefCell<Widget>>) {
        widget.borrow_mut().render();
        request_animation_frame(widget);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::RefCell;
    use std::io::BufRead;
    use std::rc::Rc;

    use tally::persistence::MemoryStore;
    use tally::platform::KeyboardHub;
    use tally::{Counter, CounterConfig, CounterView, KeyInput};

    env_logger::init();
    log::info!("Tally (native) starting...");
    log::info!("Native mode is a terminal driver - run with `trunk serve` for the web widget");

    let config = match std::env::args().nth(1) {
        Some(json) => match CounterConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => CounterConfig::default(),
    };

    let counter = match Counter::with_store(config, Box::new(MemoryStore::new())) {
        Ok(counter) => counter,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let hub = KeyboardHub::new();
    let mut view = CounterView::new(Rc::new(RefCell::new(counter)));
    view.activate(&hub);

    println!("Keys: ArrowUp/up/+  ArrowDown/down/-  Ctrl+R  (quit to exit)");
    println!("{}", view.snapshot().value);

    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        let Some(input) = KeyInput::parse_chord(line) else {
            println!("? {line}");
            continue;
        };
        hub.press(&input);
        let snap = view.snapshot();
        println!(
            "{} [dec:{} inc:{} reset:{}]",
            snap.value,
            if snap.decrement.disabled { "off" } else { "on" },
            if snap.increment.disabled { "off" } else { "on" },
            if snap.reset.disabled { "off" } else { "on" },
        );
    }

    view.deactivate();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
