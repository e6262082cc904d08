use std::{
    io::{self, Read},
    thread,
};

use byteorder::{LittleEndian, ReadBytesExt};
use flume::{Receiver, Sender};
use tracing::trace;

use crate::{
    audio::{
        codec::FrameEncoder,
        constants::{ENCODE_QUEUE_CAPACITY, FRAME_SIZE_SAMPLES},
    },
    common::{
        errors::{LoadError, PartialTranscode},
        types::Frame,
    },
};

/// Cut `reader` into 20 ms chunks and encode each one into a frame.
///
/// Chunks are read on the calling thread and handed to a dedicated encode
/// worker through a bounded channel. There is exactly one producer and one
/// consumer, so the returned frames are in chunk-read order.
///
/// End of stream, clean or in the middle of a chunk, ends the loop; the partial
/// trailing chunk is discarded. Any other read error, or an encode error,
/// stops transcoding; frames produced up to that point are returned inside
/// the [`PartialTranscode`].
pub fn transcode<R, E>(mut reader: R, encoder: E) -> Result<Vec<Frame>, PartialTranscode>
where
    R: Read,
    E: FrameEncoder,
{
    let (chunk_tx, chunk_rx) = flume::bounded::<Vec<i16>>(ENCODE_QUEUE_CAPACITY);

    let worker = thread::Builder::new()
        .name("frame-encoder".to_string())
        .spawn(move || encode_worker(encoder, chunk_rx))
        .map_err(|e| PartialTranscode {
            frames: Vec::new(),
            source: LoadError::WorkerSpawn(e),
        })?;

    let read_result = read_chunks(&mut reader, &chunk_tx);
    // Closing the hand-off lets the worker drain and exit.
    drop(chunk_tx);

    let (frames, encode_result) = worker.join().map_err(|_| PartialTranscode {
        frames: Vec::new(),
        source: LoadError::WorkerPanicked,
    })?;

    match (encode_result, read_result) {
        (Err(source), _) | (Ok(()), Err(source)) => Err(PartialTranscode { frames, source }),
        (Ok(()), Ok(())) => Ok(frames),
    }
}

fn read_chunks<R: Read>(reader: &mut R, chunk_tx: &Sender<Vec<i16>>) -> Result<(), LoadError> {
    let mut chunks = 0usize;
    loop {
        let mut chunk = vec![0i16; FRAME_SIZE_SAMPLES];
        match reader.read_i16_into::<LittleEndian>(&mut chunk) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                trace!("PCM stream ended after {} chunks", chunks);
                return Ok(());
            }
            Err(e) => return Err(LoadError::ChunkRead(e)),
        }

        if chunk_tx.send(chunk).is_err() {
            // Worker stopped early; it reports its own error.
            return Ok(());
        }
        chunks += 1;
    }
}

fn encode_worker<E: FrameEncoder>(
    mut encoder: E,
    chunk_rx: Receiver<Vec<i16>>,
) -> (Vec<Frame>, Result<(), LoadError>) {
    let mut frames = Vec::new();
    for chunk in chunk_rx.iter() {
        match encoder.encode(&chunk) {
            Ok(frame) => frames.push(frame),
            Err(e) => return (frames, Err(e)),
        }
    }
    (frames, Ok(()))
}
