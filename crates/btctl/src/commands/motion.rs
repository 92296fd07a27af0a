//! Direct platform movement commands

use bluetiger::Pose;

use super::{Context, MoveCommands, PoseArgs, open_session};
use crate::error::CliError;
use crate::output;

impl PoseArgs {
    fn to_pose(&self) -> Result<Pose, CliError> {
        if !self.position.is_finite() || !self.axis.is_finite() || !self.angle.is_finite() {
            return Err(CliError::InvalidInput(
                "pose values must be finite".to_string(),
            ));
        }
        Ok(Pose {
            position: self.position,
            rotation_axis: self.axis,
            rotation_angle: self.angle,
        })
    }
}

pub fn execute(cmd: &MoveCommands, ctx: &Context) -> Result<(), CliError> {
    let (pose, relative) = match cmd {
        MoveCommands::Absolute(args) => (args.to_pose()?, false),
        MoveCommands::Relative(args) => (args.to_pose()?, true),
    };

    let backend = ctx.backend()?;
    let session = open_session(&*backend, &ctx.config)?;
    if relative {
        session.move_relative(&pose)?;
    } else {
        session.move_absolute(&pose)?;
    }
    session.close()?;

    let kind = if relative { "Moved by" } else { "Moved to" };
    output::print_success(
        &format!(
            "{kind} position {} rotation {:.3} rad about {}",
            pose.position, pose.rotation_angle, pose.rotation_axis
        ),
        ctx.json,
    );
    Ok(())
}
