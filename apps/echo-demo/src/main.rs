//! Minimal end-to-end wiring: each stdin line is published as a submit event
//! and echoed back from the keystroke hook's `on_submit` observer.

use std::io::{self, BufRead};
use std::rc::Rc;

use rehook_core::{Instance, Scope, Services};
use rehook_foundation::{use_keystroke, SubmitHandler};
use rehook_input::{Event, InputBus};

fn main() {
    env_logger::init();

    let bus = InputBus::new();
    let mut services = Services::new();
    services.register(bus.clone());
    let mut instance = Instance::new(services);

    let on_submit: SubmitHandler = Rc::new(|text| println!("submitted: {text}"));
    let mut content =
        move |scope: &mut Scope<'_>| use_keystroke(scope, Some(Rc::clone(&on_submit)));

    instance.render(&mut content);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        bus.publish(&Event::submit(line));
        instance.settle(&mut content);
    }

    instance.teardown();
}
