//! Implementation of the `bler-sweep codes` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::adapters::BuiltinCodecs;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::ports::{CodecFactory, StructureInfo};

#[derive(Args, Debug, Default)]
pub struct CodesArgs {}

#[derive(Debug, Serialize)]
pub struct CodesOutput {
    pub structures: Vec<StructureInfo>,
}

impl CommandOutput for CodesOutput {
    fn to_human(&self) -> String {
        TableFormatter::new().format_structures(&self.structures)
    }
}

pub fn execute(_args: CodesArgs, json_mode: bool) -> Result<()> {
    let output_data = CodesOutput {
        structures: BuiltinCodecs::new().structures(),
    };
    output(&output_data, json_mode);
    Ok(())
}
