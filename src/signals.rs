//! OS signals as a cancellation stream for the engine.
//!
//! Each delivered signal yields its name. Must be called from inside a tokio
//! runtime.

use futures::stream::{self, BoxStream, StreamExt};

use crate::Result;

/// SIGTERM, SIGINT and SIGQUIT, merged into one stream.
#[cfg(unix)]
pub fn termination_signals() -> Result<BoxStream<'static, &'static str>> {
    use tokio::signal::unix::{signal, SignalKind};

    let kinds = [
        (SignalKind::terminate(), "SIGTERM"),
        (SignalKind::interrupt(), "SIGINT"),
        (SignalKind::quit(), "SIGQUIT"),
    ];

    let mut streams = Vec::with_capacity(kinds.len());
    for (kind, name) in kinds {
        let sig = signal(kind)?;
        streams.push(
            stream::unfold(sig, move |mut sig| async move {
                sig.recv().await.map(|()| (name, sig))
            })
            .boxed(),
        );
    }
    Ok(stream::select_all(streams).boxed())
}

/// Ctrl-C, the only termination request available off Unix.
#[cfg(not(unix))]
pub fn termination_signals() -> Result<BoxStream<'static, &'static str>> {
    Ok(stream::unfold((), |()| async {
        tokio::signal::ctrl_c().await.ok().map(|()| ("Ctrl-C", ()))
    })
    .boxed())
}
