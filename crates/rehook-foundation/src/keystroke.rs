use std::rc::Rc;

use rehook_core::{EffectCleanup, Scope};
use rehook_input::{Event, InputBus};

/// Observer invoked once per accepted submission with the submitted text.
pub type SubmitHandler = Rc<dyn Fn(&str)>;

/// State carried by [`use_keystroke`].
///
/// `submit_version` only increases, by exactly one per accepted submission;
/// `text` only changes together with such an increment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeystrokeState {
    pub text: String,
    pub submit_version: u64,
}

/// Binds the calling instance to the input bus and reports submissions.
///
/// Subscribes once at mount and unsubscribes at teardown. Submit events
/// update the state through the queued-transition setter; `on_submit` is
/// invoked from a follow-up effect keyed on `submit_version`, so it observes
/// the rendered state of its submission and runs exactly once per increment,
/// never during event dispatch. The returned `(text, submit_version)` pair is
/// for observability; reacting through `on_submit` is the canonical path.
pub fn use_keystroke(scope: &mut Scope<'_>, on_submit: Option<SubmitHandler>) -> (String, u64) {
    let (state, set_state) = scope.use_state(KeystrokeState::default);
    let bus = scope.service::<InputBus>();

    // The setter stays valid for the life of the instance, so the handler
    // never needs to be rebuilt.
    let handler = scope.use_callback((), move |event: &Event| {
        if event.is_submit() {
            let text = event.value_or_default().to_owned();
            set_state.update(move |prev| KeystrokeState {
                text,
                submit_version: prev.submit_version + 1,
            });
        }
    });

    let subscribe_bus = Rc::clone(&bus);
    let subscribed = handler.clone();
    scope.use_effect(handler, move |effect| {
        let subscription = subscribe_bus.subscribe(subscribed);
        effect.on_cleanup(move || subscription.unsubscribe())
    });

    let text = state.text.clone();
    let version = state.submit_version;
    scope.use_effect(version, move |_| {
        // The first pass runs this with version 0; that is not a submission.
        if version > 0 {
            if let Some(on_submit) = &on_submit {
                on_submit(&text);
            }
        }
        EffectCleanup::none()
    });

    (state.text, state.submit_version)
}
