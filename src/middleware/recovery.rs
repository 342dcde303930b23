//! Panic recovery.
//!
//! [`recovery`] must be the first entry of the chain so that a panic anywhere
//! downstream unwinds into it. The panic is turned into a 500 JSON response via
//! [`Context::fail`](crate::context::Context::fail).
//!
//! The backtrace is captured at the panic site by a process-wide hook that is
//! installed once and chains to the previous hook.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::context::{handler, HandlerFunc};
use crate::http::response::StatusCode;

thread_local! {
    static LAST_BACKTRACE: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            LAST_BACKTRACE.with(|slot| {
                *slot.borrow_mut() = Some(Backtrace::force_capture());
            });
            previous(info);
        }));
    });
}

/// Text of a panic payload, for `panic!("literal")` and `panic!("{}", x)` alike.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub fn recovery() -> HandlerFunc {
    install_hook();

    handler(|c| {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| c.next()));

        if let Err(payload) = outcome {
            let message = panic_message(payload.as_ref());
            let trace = LAST_BACKTRACE
                .with(|slot| slot.borrow_mut().take())
                .map(|bt| bt.to_string())
                .unwrap_or_default();

            tracing::error!(
                method = %c.method,
                path = %c.path,
                panic = %message,
                "Recovered from panic\nTraceback:\n{}",
                trace
            );
            c.fail(StatusCode::InternalServerError, "Internal Server Error");
        }
    })
}
