//! Interactive dialogue for building an [`AdjustmentSpec`].
//!
//! All questions flow through a [`Prompter`] that owns its input and output
//! handles, so the full dialogue can be scripted in tests with in-memory
//! buffers. The question order and wording mirror what the tool has always
//! asked: a yes/no gate per adjustment, then the parameter with its
//! advertised range and default.
//!
//! Answer conventions: only a literal `yes` (any casing) counts as yes; an
//! empty parameter answer takes the default; anything non-numeric where a
//! number is required ends the run.

use std::io::{self, BufRead, Write};

use retouch_core::AdjustmentSpec;
use thiserror::Error;

/// Errors raised by the interactive dialogue.
#[derive(Debug, Error)]
pub enum PromptError {
    /// A numeric prompt received an answer that does not parse.
    #[error("invalid numeric input: {input:?}")]
    InvalidNumber { input: String },

    /// Reading or writing the terminal failed.
    #[error("prompt I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// What the user chose to do with a previewed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDecision {
    Yes,
    No,
    Retry,
}

/// Question/answer channel over arbitrary read/write handles.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter and hand back its output handle, so tests can
    /// inspect the transcript after a dialogue.
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a line of user-facing output (not a question).
    pub fn say(&mut self, line: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{line}")?;
        self.output.flush()?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask_yes_no(&mut self, question: &str) -> Result<bool, PromptError> {
        Ok(self.ask(question)?.eq_ignore_ascii_case("yes"))
    }

    fn ask_f32(&mut self, question: &str, default: f32) -> Result<f32, PromptError> {
        let answer = self.ask(question)?;
        if answer.is_empty() {
            return Ok(default);
        }
        answer
            .parse()
            .map_err(|_| PromptError::InvalidNumber { input: answer })
    }

    fn ask_i32(&mut self, question: &str, default: i32) -> Result<i32, PromptError> {
        let answer = self.ask(question)?;
        if answer.is_empty() {
            return Ok(default);
        }
        answer
            .parse()
            .map_err(|_| PromptError::InvalidNumber { input: answer })
    }

    fn ask_u32(&mut self, question: &str, default: u32) -> Result<u32, PromptError> {
        let answer = self.ask(question)?;
        if answer.is_empty() {
            return Ok(default);
        }
        answer
            .parse()
            .map_err(|_| PromptError::InvalidNumber { input: answer })
    }

    /// The one-time gate before any processing starts.
    pub fn ask_batch_mode(&mut self) -> Result<bool, PromptError> {
        self.ask_yes_no(
            "Would you like to process all images automatically without preview? (yes/no):",
        )
    }

    /// Walk the full adjustment dialogue and build the spec.
    ///
    /// Declined adjustments are left out of the spec entirely; grayscale is
    /// the exception and is always recorded as a flag.
    pub fn acquire_spec(&mut self) -> Result<AdjustmentSpec, PromptError> {
        let mut spec = AdjustmentSpec::new();

        if self.ask_yes_no("Do you want to adjust brightness? (yes/no, default = no):")? {
            spec.brightness =
                Some(self.ask_f32("Brightness (range: 0.0 to 3.0, default = 1.0):", 1.0)?);
        }
        if self.ask_yes_no("Do you want to adjust contrast? (yes/no, default = no):")? {
            spec.contrast =
                Some(self.ask_f32("Contrast (range: 0.0 to 3.0, default = 1.0):", 1.0)?);
        }
        if self.ask_yes_no("Do you want to adjust sharpness? (yes/no, default = no):")? {
            spec.sharpness =
                Some(self.ask_f32("Sharpness (range: 0.0 to 3.0, default = 1.0):", 1.0)?);
        }
        if self.ask_yes_no("Do you want to apply blur? (yes/no, default = no):")? {
            spec.blur = Some(self.ask_f32("Blur (range: 0 to 10, default = 0):", 0.0)?);
        }
        if self.ask_yes_no("Do you want to rotate the image? (yes/no, default = no):")? {
            spec.rotation =
                Some(self.ask_i32("Rotation (degrees, range: 0 to 360, default = 0):", 0)?);
        }
        if self.ask_yes_no("Do you want to resize the image? (yes/no, default = no):")? {
            let width = self.ask_u32("Resize width (in pixels, default = 800px):", 800)?;
            let height = self.ask_u32("Resize height (in pixels, default = 800px):", 800)?;
            spec.resize = Some((width, height));
        }
        if self.ask_yes_no("Do you want to adjust saturation? (yes/no, default = no):")? {
            spec.saturation =
                Some(self.ask_f32("Saturation (range: 0.0 to 3.0, default = 1.0):", 1.0)?);
        }
        spec.grayscale =
            self.ask_yes_no("Do you want to convert to black and white? (yes/no, default = no):")?;

        Ok(spec)
    }

    /// Per-image gate: revert the working image to the original?
    pub fn ask_undo(&mut self) -> Result<bool, PromptError> {
        self.ask_yes_no("Undo the last edit? (yes/no):")
    }

    /// Per-image save decision; anything but `yes`/`retry` means no.
    pub fn ask_save_decision(&mut self) -> Result<SaveDecision, PromptError> {
        let answer = self.ask("Save the image? (yes/no/retry):")?.to_lowercase();
        Ok(match answer.as_str() {
            "yes" => SaveDecision::Yes,
            "retry" => SaveDecision::Retry,
            _ => SaveDecision::No,
        })
    }
}
