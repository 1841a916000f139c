error_chain! {
    errors {
        DuplicateFileMapping(source_name: String) {
            description("source file mapped more than once")
            display("Source file '{}' is mapped more than once", source_name)
        }
        InvalidName(line_number: usize, name: String) {
            description("mapped name is not a plain file or folder name")
            display("Name '{}' on line {} must not contain path separators or relative components", name, line_number)
        }
        UnknownDirective(line_number: usize, line: String) {
            description("unrecognized mapping directive")
            display("Unrecognized mapping directive on line {}: '{}'", line_number, line)
        }
    }
}
