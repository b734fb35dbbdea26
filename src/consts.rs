// Well-known JVM internal names and fixed output fragments

// java.lang.invoke types referenced by synthesized handle-resolution code
pub const T_METHOD_HANDLE: &str = "java/lang/invoke/MethodHandle";
pub const T_METHOD_TYPE: &str = "java/lang/invoke/MethodType";
pub const T_METHOD_HANDLES: &str = "java/lang/invoke/MethodHandles";
pub const T_LOOKUP: &str = "java/lang/invoke/MethodHandles$Lookup";

// Failure category caught by the synthesized static initializer
pub const T_REFLECTIVE_OPERATION_EXCEPTION: &str = "java/lang/ReflectiveOperationException";

pub const T_OBJECT: &str = "java/lang/Object";

// Naming scheme for synthesized declarations
pub const HELPER_TYPE_PREFIX: &str = "DecafConstantHelper";
pub const HANDLE_FIELD_NAME: &str = "HANDLE";

// Fixed comment texts attached to synthesized code
pub const HELPER_COMMENT_LINE_1: &str =
    " This helper class was generated by decaf to approximate the behavior of a";
pub const HELPER_COMMENT_LINE_2: &str =
    " MethodHandle constant that cannot (currently) be represented in Java code.";
pub const SUBSTITUTION_COMMENT: &str = " ldc_method_handle(!) ";
