use std::io::Cursor;

/// Decodes and plays a cry, blocking until playback ends.
pub fn play_ogg(bytes: Vec<u8>, volume: f32) -> Result<(), String> {
    let cursor = Cursor::new(bytes);
    let (_stream, handle) = rodio::OutputStream::try_default().map_err(|err| err.to_string())?;
    let sink = rodio::Sink::try_new(&handle).map_err(|err| err.to_string())?;
    let source = rodio::Decoder::new(cursor).map_err(|err| err.to_string())?;
    sink.set_volume(volume.clamp(0.0, 1.0));
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
