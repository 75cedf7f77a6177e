pub mod settings;

pub mod compiler_messages {
    pub mod compiler_dev_logging;
    pub mod compiler_errors;
    pub mod compiler_warnings;
    pub mod display_messages;
}

pub mod program {
    pub mod declarations;
    pub mod declared_types;
    pub mod locations;

    #[cfg(test)]
    pub(crate) mod tests;
}

pub mod annotations {
    pub mod annotation_args;
    pub mod annotation_defs;
    pub mod annotation_kind;
    pub mod selectors;

    #[cfg(test)]
    mod tests;
}

pub mod contract {
    pub mod contract_program;
    pub mod element_defs;

    #[cfg(test)]
    mod tests;
}

pub mod metadata {
    pub mod abi;
    pub mod generator;
    pub mod type_registry;

    #[cfg(test)]
    mod tests;
}


use crate::compiler_messages::compiler_errors::{CompilerError, CompilerMessages};
use crate::compiler_messages::compiler_warnings::CompilerWarning;
use crate::contract::contract_program::ContractProgram;
use crate::metadata::abi::InterfaceDescription;
use crate::metadata::generator::MetadataGenerator;
use crate::program::declarations::SourceProgram;
use crate::settings::Config;
use std::path::Path;
use std::fs;

/// A successful run, plus any warnings raised on the way
#[derive(Debug)]
pub struct GeneratedInterface {
    pub interface: InterfaceDescription,
    pub warnings: Vec<CompilerWarning>,
}

pub struct AbiGenerator<'a> {
    config: &'a Config,
}

impl<'a> AbiGenerator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    // -----------------------------
    //        PROGRAM LOADING
    // -----------------------------
    /// The declaration tree comes from the host parser and type checker,
    /// serialised as JSON.
    pub fn source_to_program(&self, source: &str) -> Result<SourceProgram, CompilerError> {
        SourceProgram::from_json(source)
    }

    pub fn file_to_program(&self, program_path: &Path) -> Result<SourceProgram, CompilerError> {
        let source = match fs::read_to_string(program_path) {
            Ok(source) => source,
            Err(e) => {
                return Err(CompilerError::file_error(
                    program_path,
                    format!("Could not read the program description: {e}"),
                ));
            }
        };

        match SourceProgram::from_json(&source) {
            Ok(program) => Ok(program),
            Err(e) => {
                let mut location = e.location.to_owned();
                location.scope = program_path.to_path_buf();
                Err(e.with_location(location))
            }
        }
    }

    // -----------------------------
    //       CONTRACT ANALYSIS
    // -----------------------------
    /// Classifies and validates every annotation in the program.
    /// This section answers the following questions:
    /// - Which class is the contract, and which classes are events?
    /// - What are the constructors, messages and persistent fields?
    /// - Which types make up the public surface, and in what order were they found?
    pub fn program_to_contract<'p>(
        &self,
        program: &'p SourceProgram,
    ) -> Result<ContractProgram<'p>, CompilerMessages> {
        ContractProgram::new(program)
    }

    // -----------------------------
    //       METADATA CREATION
    // -----------------------------
    /// Builds the type table, the contract spec and the storage layout
    pub fn contract_to_interface(
        &self,
        contract_program: &ContractProgram,
    ) -> Result<InterfaceDescription, CompilerError> {
        MetadataGenerator::new(self.config).create_metadata(contract_program)
    }
}

/// Runs every stage over an already loaded program
pub fn generate_interface(
    program: &SourceProgram,
    config: &Config,
) -> Result<GeneratedInterface, CompilerMessages> {
    let generator = AbiGenerator::new(config);
    let contract_program = generator.program_to_contract(program)?;

    match generator.contract_to_interface(&contract_program) {
        Ok(interface) => Ok(GeneratedInterface {
            interface,
            warnings: contract_program.warnings,
        }),
        Err(e) => Err(CompilerMessages::from_error(e, contract_program.warnings)),
    }
}
