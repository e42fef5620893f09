use std::io;

use store::IndexOutput;


/// Closes every output, even if some of them fail
///
/// Returns the first error encountered.
pub fn close<I>(outputs: I) -> io::Result<()>
    where I: IntoIterator<Item = Option<Box<dyn IndexOutput>>>
{
    let mut first_error = None;

    for output in outputs {
        if let Some(output) = output {
            let name = output.name().to_string();

            if let Err(e) = output.close() {
                debug!("failed to close {}: {}", name, e);

                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}


/// Closes every output, discarding any errors
///
/// Used on failure paths, where the error that caused the cleanup is the one
/// the caller needs to see.
pub fn close_while_handling_error<I>(outputs: I)
    where I: IntoIterator<Item = Option<Box<dyn IndexOutput>>>
{
    for output in outputs {
        if let Some(output) = output {
            let name = output.name().to_string();

            if let Err(e) = output.close() {
                warn!("suppressed error while closing {}: {}", name, e);
            }
        }
    }
}
