/// Configuration macros
///
/// `config_struct!` defines a configuration section with its defaults inline,
/// so a field, its type and its default value are written exactly once.

/// Define a configuration struct with embedded defaults
///
/// Generates:
/// - The struct with public fields
/// - `Default` using the given values
/// - Serde support with `#[serde(default)]`, so a TOML file only needs the
///   fields it changes
///
/// # Example
/// ```ignore
/// config_struct! {
///     pub struct ImportConfig {
///         fetch_timeout_secs: u64 = 15,
///         fallback_delimiter: String = ";".to_string(),
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
