//! Deprecated driver configuration: network address, tuning, diagnostics

use bluetiger::{LegacyConfiguration, NetworkAddress};

use super::{
    AddressCommands, Backend, Context, DiagCommands, LegacyCommands, TuningArgs, TuningCommands,
    open_session,
};
use crate::error::CliError;
use crate::output;

pub fn execute(cmd: &LegacyCommands, ctx: &Context) -> Result<(), CliError> {
    let backend = ctx.backend()?;
    let session = open_session(&*backend, &ctx.config)?;
    run(cmd, &*backend, ctx.json)?;
    session.close()?;
    Ok(())
}

fn run(cmd: &LegacyCommands, platform: &dyn Backend, json: bool) -> Result<(), CliError> {
    match cmd {
        LegacyCommands::Address(AddressCommands::Show) => {
            output::print_address(&platform.address()?, json);
        }
        LegacyCommands::Address(AddressCommands::Set {
            mac,
            ip,
            netmask,
            router,
            dhcp,
        }) => {
            let address = NetworkAddress {
                mac: *mac,
                ip: *ip,
                netmask: *netmask,
                router: *router,
                dynamic: *dhcp,
            };
            platform.set_address(&address)?;
            tracing::info!(%address.ip, dynamic = address.dynamic, "network address written");
            output::print_success("Network address updated", json);
        }
        LegacyCommands::Tuning(TuningCommands::Show) => {
            output::print_tuning(&platform.tuning()?, json);
        }
        LegacyCommands::Tuning(TuningCommands::Set(args)) => {
            let written = apply_tuning(platform, args)?;
            if written == 0 {
                output::print_warning("No tuning parameters given", json);
            } else {
                output::print_success(&format!("Wrote {written} tuning parameter(s)"), json);
            }
        }
        LegacyCommands::Diag(DiagCommands::Start { id }) => {
            platform.start_diagnostic(*id)?;
            output::print_success(&format!("Diagnostic {id} started"), json);
        }
        LegacyCommands::Diag(DiagCommands::Status) => {
            output::print_diagnostic(&platform.diagnostic_status()?, json);
        }
    }
    Ok(())
}

/// Write the given parameters in a fixed order, stopping at the first failure.
fn apply_tuning(platform: &dyn Backend, args: &TuningArgs) -> Result<usize, CliError> {
    let mut written = 0;
    let mut write = |result: bluetiger::BtResult<()>| -> Result<(), CliError> {
        result?;
        written += 1;
        Ok(())
    };

    if let Some(v) = args.motion_limit_range {
        write(platform.set_motion_limit_range(v))?;
    }
    if let Some(v) = args.acceleration_pitch {
        write(platform.set_acceleration_pitch(v))?;
    }
    if let Some(v) = args.acceleration_roll {
        write(platform.set_acceleration_roll(v))?;
    }
    if let Some(v) = args.acceleration_heave {
        write(platform.set_acceleration_heave(v))?;
    }
    if let Some(v) = args.position_pitch {
        write(platform.set_position_pitch(v))?;
    }
    if let Some(v) = args.position_roll {
        write(platform.set_position_roll(v))?;
    }
    if let Some(v) = args.position_heave {
        write(platform.set_position_heave(v))?;
    }
    if let Some(v) = args.effect_scaling {
        write(platform.set_effect_scaling(v))?;
    }
    if let Some(v) = args.tip_rounding {
        write(platform.set_tip_rounding(v))?;
    }
    Ok(written)
}
