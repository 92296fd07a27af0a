//! Effect definition and playback commands

use std::path::Path;

use bluetiger::{Amplitude, EffectLibrary, EffectScript, EffectSlot, Repetitions};

use super::{Backend, Context, EffectCommands, open_session, read_document};
use crate::error::CliError;
use crate::output;

pub fn execute(cmd: &EffectCommands, ctx: &Context) -> Result<(), CliError> {
    // Read and validate scripts before touching the driver.
    let script = match cmd {
        EffectCommands::Define { file, .. } => Some(load_script(file)?),
        EffectCommands::Play { file, .. } | EffectCommands::Start { file, .. } => {
            file.as_deref().map(load_script).transpose()?
        }
        EffectCommands::Stop { .. } => None,
    };

    let backend = ctx.backend()?;
    let session = open_session(&*backend, &ctx.config)?;
    run(cmd, script.as_ref(), &*backend, ctx.json)?;
    session.close()?;
    Ok(())
}

fn run(
    cmd: &EffectCommands,
    script: Option<&EffectScript>,
    platform: &dyn Backend,
    json: bool,
) -> Result<(), CliError> {
    let upload = |slot: EffectSlot| -> Result<(), CliError> {
        if let Some(script) = script {
            EffectLibrary::upload(platform, slot, script)?;
        }
        Ok(())
    };

    match *cmd {
        EffectCommands::Define { slot, .. } => {
            let slot = EffectSlot(slot);
            upload(slot)?;
            let steps = script.map_or(0, EffectScript::len);
            output::print_success(&format!("Defined {steps}-step effect in {slot}"), json);
        }
        EffectCommands::Play {
            slot,
            amplitude,
            repetitions,
            ..
        } => {
            let slot = EffectSlot(slot);
            upload(slot)?;
            let mut warnings = Vec::new();
            if repetitions == 0 {
                warnings.push("Repetitions is 0; the driver may ignore this play".to_string());
            }
            EffectLibrary::play(platform, slot, Amplitude(amplitude), Repetitions(repetitions))?;
            output::print_success_with_warnings(
                &format!("Playing {slot} x{repetitions} at amplitude {amplitude}"),
                &warnings,
                json,
            );
        }
        EffectCommands::Start {
            slot, amplitude, ..
        } => {
            let slot = EffectSlot(slot);
            upload(slot)?;
            EffectLibrary::start(platform, slot, Amplitude(amplitude))?;
            output::print_success(
                &format!("Started {slot} at amplitude {amplitude}"),
                json,
            );
        }
        EffectCommands::Stop { slot } => {
            let slot = EffectSlot(slot);
            EffectLibrary::stop(platform, slot)?;
            output::print_success(&format!("Stopped {slot}"), json);
        }
    }
    Ok(())
}

/// Parse and validate an effect script file.
fn load_script(path: &Path) -> Result<EffectScript, CliError> {
    let script: EffectScript = read_document(path)?;
    script
        .validate()
        .map_err(|e| CliError::InvalidInput(format!("{}: {e}", path.display())))?;
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluetiger::{Identity, MockPlatform, MotionPlatform, Session};
    use std::path::PathBuf;

    #[test]
    fn test_play_with_script_defines_first() -> Result<(), CliError> {
        let mock = MockPlatform::new();
        let _session = Session::open(&mock, &Identity::default())?;
        let script = EffectScript::named("kick").hold(50);
        let cmd = EffectCommands::Play {
            slot: 3,
            amplitude: 200,
            repetitions: 2,
            file: Some(PathBuf::from("unused.yaml")),
        };
        run(&cmd, Some(&script), &mock, true)?;
        assert!(mock.effect(3).is_some());
        Ok(())
    }

    #[test]
    fn test_play_undefined_slot_is_invalid_input() -> Result<(), CliError> {
        let mock = MockPlatform::new();
        mock.init(&Identity::default())?;
        let cmd = EffectCommands::Play {
            slot: 9,
            amplitude: 255,
            repetitions: 1,
            file: None,
        };
        let err = run(&cmd, None, &mock, true).err();
        assert!(matches!(err, Some(CliError::InvalidInput(_))));
        Ok(())
    }

    #[test]
    fn test_missing_script_file() {
        let err = load_script(Path::new("/nonexistent/effect.yaml")).err();
        assert!(matches!(err, Some(CliError::InvalidInput(_))));
    }
}
