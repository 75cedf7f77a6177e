use crate::compiler_messages::compiler_errors::CompilerError;
use crate::contract::contract_program::{ContractDef, ContractProgram};
use crate::contract::element_defs::create_default_constructor;
use crate::metadata::abi::{
    ContractInfo, ContractSpec, InterfaceDescription, SourceInfo, StorageLayout,
};
use crate::metadata::type_registry::TypeRegistry;
use crate::settings::Config;
use crate::{metadata_log, timer_log};
use std::time::Instant;

/// Assembles the Interface Description from the analysed contract.
///
/// The type registry lives for exactly one `create_metadata` call,
/// so two runs over the same program produce identical output.
pub struct MetadataGenerator<'a> {
    config: &'a Config,
}

impl<'a> MetadataGenerator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn create_metadata(
        &self,
        contract_program: &ContractProgram,
    ) -> Result<InterfaceDescription, CompilerError> {
        let _time = Instant::now();
        let mut registry = TypeRegistry::new(contract_program.program, self.config);

        // Exported types go first so the table follows discovery order
        for exported in &contract_program.exported_types {
            registry.resolve(exported.ty, exported.location)?;
        }
        timer_log!(_time, "Exported types resolved in: ");

        let spec = create_contract_spec(contract_program, &mut registry)?;
        let storage = create_storage_layout(&contract_program.contract, &mut registry)?;

        metadata_log!(format!(
            "Spec has {} constructors, {} messages and {} events",
            spec.constructors.len(),
            spec.messages.len(),
            spec.events.len()
        ));
        metadata_log!(format!("Storage has {} cells", storage.fields.len()));

        let types = registry.seal()?;
        metadata_log!(format!("Type table has {} entries", types.len()));
        timer_log!(_time, "Interface description created in: ");

        Ok(InterfaceDescription {
            contract: ContractInfo {
                name: contract_program.contract.name.to_owned(),
                version: self.config.version.to_owned(),
                source: SourceInfo {
                    language: self.config.language.to_owned(),
                    compiler: self.config.compiler.to_owned(),
                },
            },
            spec,
            types,
            storage,
        })
    }
}

fn create_contract_spec(
    contract_program: &ContractProgram,
    registry: &mut TypeRegistry,
) -> Result<ContractSpec, CompilerError> {
    let contract = &contract_program.contract;

    let mut events = Vec::with_capacity(contract_program.events.len());
    for event in &contract_program.events {
        events.push(event.create_metadata(registry)?);
    }

    let mut messages = Vec::with_capacity(contract.messages.len());
    for message in &contract.messages {
        messages.push(message.create_metadata(registry)?);
    }

    let mut constructors = Vec::with_capacity(contract.constructors.len() + 1);
    for constructor in &contract.constructors {
        constructors.push(constructor.create_metadata(registry)?);
    }

    if constructors.is_empty() {
        constructors.push(create_default_constructor());
    }

    Ok(ContractSpec {
        constructors,
        messages,
        events,
        docs: contract.docs.to_owned(),
    })
}

// Selectors count persistent fields from 1, a spread field shares its selector across members
fn create_storage_layout(
    contract: &ContractDef,
    registry: &mut TypeRegistry,
) -> Result<StorageLayout, CompilerError> {
    let mut fields = Vec::with_capacity(contract.storage_fields.len());

    for (position, storage_field) in contract.storage_fields.iter().enumerate() {
        let selector = position as u32 + 1;
        fields.extend(storage_field.create_metadata(selector, registry)?);
    }

    Ok(StorageLayout { fields })
}
