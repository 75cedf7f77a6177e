use crate::compiler_messages::compiler_errors::{
    CompilerError, CompilerMessages, ErrorMetaDataKey, ErrorType,
};
use crate::compiler_messages::compiler_warnings::print_formatted_warning;
use saying::say;
use std::path::{Path, PathBuf};
use std::{env, fs};

fn normalize_display_path(path: &Path) -> PathBuf {
    let path_string = path.to_string_lossy();
    if let Some(stripped) = path_string.strip_prefix(r"\\?\") {
        return PathBuf::from(stripped);
    }

    path.to_path_buf()
}

fn relative_display_path(scope: &Path) -> String {
    let normalized_scope = normalize_display_path(scope);

    match env::current_dir() {
        Ok(dir) => {
            let normalized_dir = normalize_display_path(&dir);
            normalized_scope
                .strip_prefix(&normalized_dir)
                .unwrap_or(&normalized_scope)
                .to_string_lossy()
                .to_string()
        }
        Err(err) => {
            say!(Red "Failed to resolve the current directory for the error snippet: ", err);
            normalized_scope.to_string_lossy().to_string()
        }
    }
}

pub fn print_compiler_messages(messages: CompilerMessages) {
    for err in messages.errors {
        print_formatted_error(err);
    }

    for warning in messages.warnings {
        print_formatted_warning(warning);
    }
}

pub fn print_formatted_error(e: CompilerError) {
    let relative_dir = relative_display_path(&e.location.scope);
    let line_number = e.location.start_pos.line_number.max(1) as usize;

    // Line numbers from the host parser are 1-based
    let line = match fs::read_to_string(normalize_display_path(&e.location.scope)) {
        Ok(file) => file
            .lines()
            .nth(line_number - 1)
            .unwrap_or_default()
            .to_string(),
        Err(_) => String::new(),
    };

    match e.error_type {
        ErrorType::UnsupportedAnnotation
        | ErrorType::MalformedArguments
        | ErrorType::MissingRequiredField
        | ErrorType::FieldTypeMismatch
        | ErrorType::InvalidSelectorFormat
        | ErrorType::ConflictingModifiers => {
            if !relative_dir.is_empty() {
                say!("\n(╯°□°)╯  ", Dark Magenta relative_dir);
            }

            say!(Red "Annotation");
            say!(Dark Magenta "Line ", Bright { line_number });
        }

        ErrorType::Type => {
            if !relative_dir.is_empty() {
                say!("\n(ಠ_ಠ) ", Dark Magenta relative_dir);
            }

            say!(Red "Type Error");
            say!(Dark Magenta "Line ", Bright { line_number });
        }

        ErrorType::Rule => {
            if !relative_dir.is_empty() {
                say!("\nヽ(˶°o°)ﾉ  ", Dark Magenta relative_dir);
            }

            say!(Red "Contract Rule");
            say!(Dark Magenta "Line ", Bright { line_number });
        }

        ErrorType::File => {
            say!(Yellow "Can't find/read file or directory: ", relative_dir);
            say!(e.msg);
            return;
        }

        ErrorType::Config => {
            say!(Yellow "CONFIG FILE ISSUE - ");
            say!(Dark Yellow "Malformed config file, something doesn't make sense inside the generator config");
            say!(e.msg);
            return;
        }

        ErrorType::Compiler => {
            say!(Yellow "GENERATOR BUG - ");
            say!(Dark Yellow "metadata generator developer skill issue (not your fault)");
        }
    }

    say!(Red e.msg);

    if let Some(suggestion) = e.metadata.get(&ErrorMetaDataKey::PrimarySuggestion) {
        say!(Green "Suggestion: ", suggestion);
    }

    if line.is_empty() {
        return;
    }

    println!("\n{line}");

    // Spaces before the relevant part of the line
    print!(
        "{}",
        " ".repeat((e.location.start_pos.char_column - 1).max(0) as usize)
    );

    let length_of_underline = if e.location.end_pos.line_number == e.location.start_pos.line_number
    {
        (e.location.end_pos.char_column - e.location.start_pos.char_column + 1).max(1) as usize
    } else {
        1
    };
    say!(Red { "^".repeat(length_of_underline) });
}
