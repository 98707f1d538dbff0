//! Prompt augmentation that points the model at a knowledge-base document.
//!
//! The remote model locates the document from these labeled fields, so the
//! wording, labels and field order are fixed.

/// System prompt used to pull a document's plain text through the model.
pub const DOCUMENT_READER_SYSTEM_PROMPT: &str = "You are a document reader. Extract and return ONLY the text content of the document without any additional commentary or formatting.";

/// User prompt paired with [`DOCUMENT_READER_SYSTEM_PROMPT`].
pub const DOCUMENT_READER_USER_PROMPT: &str =
    "Please provide the complete text content of this document exactly as it appears.";

fn document_fields(kb_name: &str, file_id: &str, file_name: &str) -> String {
    format!(
        "- knowledge_base_name: {}\n- file_id: {}\n- filename: {}\n",
        kb_name, file_id, file_name
    )
}

/// Append the document block to a base system prompt.
pub fn augment_system_prompt(base: &str, kb_name: &str, file_id: &str, file_name: &str) -> String {
    format!(
        "{}\n\nYou have access to a knowledge-base document with:\n{}Use the contents of that document when answering the user.",
        base,
        document_fields(kb_name, file_id, file_name)
    )
}

/// Append the document block to a base user prompt.
pub fn augment_user_prompt(base: &str, kb_name: &str, file_id: &str, file_name: &str) -> String {
    format!(
        "{}\n\nThe document I want you to explain is the knowledge-base file with:\n{}Please base your explanation on that document.",
        base,
        document_fields(kb_name, file_id, file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_block() {
        let prompt = augment_system_prompt("Be brief.", "CS101", "f-42", "syllabus.pdf");
        assert_eq!(
            prompt,
            "Be brief.\n\nYou have access to a knowledge-base document with:\n\
             - knowledge_base_name: CS101\n- file_id: f-42\n- filename: syllabus.pdf\n\
             Use the contents of that document when answering the user."
        );
    }

    #[test]
    fn test_user_prompt_block() {
        let prompt = augment_user_prompt("Explain.", "CS101", "f-42", "syllabus.pdf");
        assert!(prompt.starts_with("Explain.\n\nThe document I want you to explain"));
        assert!(prompt.contains(
            "- knowledge_base_name: CS101\n- file_id: f-42\n- filename: syllabus.pdf\n"
        ));
        assert!(prompt.ends_with("Please base your explanation on that document."));
    }

    #[test]
    fn test_empty_base_still_separated() {
        let prompt = augment_user_prompt("", "K", "1", "f");
        assert!(prompt.starts_with("\n\nThe document"));
    }
}
