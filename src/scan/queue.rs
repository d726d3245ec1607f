// src/scan/queue.rs
// =============================================================================
// This module feeds target lines from the input into the work queue.
//
// How it works:
// 1. Read the next line as raw bytes, drop its "\n" / "\r\n", and turn it
//    into text. Bytes that aren't UTF-8 become U+FFFD, so an odd line is
//    just another target that (probably) won't parse as a URL
// 2. Push it into the bounded queue, waiting if the workers are behind
// 3. Stop at end of input, when the workers are gone, or when the scan is
//    cancelled - whichever comes first
//
// When this function returns, the Sender is dropped. That closes the queue,
// which is how workers learn there is nothing left to do.
//
// Rust concepts:
// - tokio::select!: wait on several things at once, take the first one ready
// - biased: check the branches top to bottom, so cancellation always wins a tie
// - AsyncBufRead: "anything we can read lines from" (a file, a byte slice, ...)
// =============================================================================

use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

// Pushes every input line into the queue
//
// Parameters:
//   input: where the target lines come from
//   queue: sending half of the work queue (dropped on return)
//   cancel: stops the feed as soon as it is cancelled
//
// Returns: how many targets were queued, or the read error that stopped us
pub async fn feed<R>(
    input: R,
    queue: mpsc::Sender<String>,
    cancel: CancellationToken,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.split(b'\n');
    let mut queued = 0;

    loop {
        let target = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            line = lines.next_segment() => match line? {
                Some(raw) => to_target(raw),
                None => break,
            },
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = queue.send(target) => {
                if sent.is_err() {
                    // Every worker is gone, nobody would read this
                    debug!("work queue closed, stopping input after {} targets", queued);
                    break;
                }
            }
        }

        queued += 1;
    }

    Ok(queued)
}

// One raw input line (without its '\n') as a target string
fn to_target(mut raw: Vec<u8>) -> String {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    match String::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
