//! Turns packed values back into the assembler's spelling.
//!
//! Every function here produces text that assembles back to the same bytes,
//! or reports that no such text exists.

use thiserror::Error;

use crate::tokens::macro_cmd::COMMAND_MASK;
use crate::tokens::meta::MODIFIER_PAIRS;
use crate::tokens::{
    key_name_for, ArgClass, KeyCode, MacroCommand, ModifierMask, ScanSet, PUSH_META,
    PUSH_META_TOKEN, UNKNOWN_KEY_NAME,
};

/// Why a value has no text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("unknown macro command 0x{0:02X}")]
    UnknownCommand(u8),

    #[error("unnamed key code 0x{0:02X}")]
    UnnamedKey(u8),

    /// A step whose command takes no argument carries a non-zero value.
    #[error("{command} takes no argument but carries 0x{value:02X}")]
    IgnoredValue { command: &'static str, value: u8 },

    #[error("modifier match {desired:02X} {matched:02X} cannot be expressed")]
    UnreachableMetaMatch { desired: u8, matched: u8 },
}

/// Key name that assembles back to `code`.
pub fn render_key(code: u8) -> Result<&'static str, RenderError> {
    match key_name_for(KeyCode(code)) {
        UNKNOWN_KEY_NAME => Err(RenderError::UnnamedKey(code)),
        name => Ok(name),
    }
}

/// Modifier tokens of a `macro` line.
///
/// Each left/right pair is rendered on its own, since the assembler's tokens
/// for one pair never touch another pair's bits.
pub fn render_meta_match(desired: ModifierMask, matched: ModifierMask) -> Result<Vec<String>, RenderError> {
    let mut tokens = Vec::new();

    for (i, (generic, left, right)) in MODIFIER_PAIRS.iter().enumerate() {
        let l = 1u8 << i;
        let r = 1u8 << (i + 4);
        let d_l = desired.0 & l != 0;
        let d_r = desired.0 & r != 0;
        let m_l = matched.0 & l != 0;
        let m_r = matched.0 & r != 0;

        // Every token that sets a desired bit also sets a matched bit on the
        // left side, except the right-hand name.
        if (d_l && !m_l) || (d_r && !m_r && !m_l) {
            return Err(RenderError::UnreachableMetaMatch {
                desired: desired.0,
                matched: matched.0,
            });
        }

        if d_r && !m_r {
            tokens.push((*generic).to_string());
            if !d_l {
                tokens.push(format!("-{left}"));
            }
        } else if m_l && m_r && !d_l && !d_r {
            tokens.push(format!("-{generic}"));
        } else {
            if m_l {
                tokens.push(if d_l { left.to_string() } else { format!("-{left}") });
            }
            if m_r {
                tokens.push(if d_r { right.to_string() } else { format!("-{right}") });
            }
        }
    }

    Ok(tokens)
}

/// Modifier names OR-ing to `mask`, generic names for complete pairs.
pub fn render_step_metas(mask: ModifierMask) -> Vec<&'static str> {
    let mut names = Vec::new();
    for (i, (generic, left, right)) in MODIFIER_PAIRS.iter().enumerate() {
        let l = mask.0 & (1 << i) != 0;
        let r = mask.0 & (1 << (i + 4)) != 0;
        match (l, r) {
            (true, true) => names.push(*generic),
            (true, false) => names.push(*left),
            (false, true) => names.push(*right),
            (false, false) => {}
        }
    }
    names
}

/// One macro step line (without indentation).
pub fn render_step(command_byte: u8, value: u8) -> Result<String, RenderError> {
    let code = command_byte & COMMAND_MASK;
    let command = MacroCommand::try_from(code).map_err(|_| RenderError::UnknownCommand(code))?;

    let mut line = String::new();
    if command_byte & PUSH_META != 0 {
        line.push_str(PUSH_META_TOKEN);
        line.push(' ');
    }
    line.push_str(command.name());

    match command.argument_class() {
        ArgClass::None if value != 0 => {
            return Err(RenderError::IgnoredValue {
                command: command.name(),
                value,
            })
        }
        ArgClass::None => {}
        ArgClass::Key => {
            line.push(' ');
            line.push_str(render_key(value)?);
        }
        ArgClass::Modifier => {
            for name in render_step_metas(ModifierMask(value)) {
                line.push(' ');
                line.push_str(name);
            }
        }
        ArgClass::Delay => {
            line.push(' ');
            line.push_str(&value.to_string());
        }
    }

    Ok(line)
}

/// Arguments of an `ifset` line; `any` for an empty mask.
///
/// Bits above the four known sets are dropped; callers check for them.
pub fn render_scanset(mask: u8) -> String {
    if mask == 0 {
        return "any".to_string();
    }
    ScanSet::ALL
        .iter()
        .filter(|set| mask & set.condition_bit() != 0)
        .map(|set| set.name())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `FN` tokens for a layer-definition combo, lowest first.
pub fn render_fn_combo(combo: u8) -> Vec<String> {
    (0..8)
        .filter(|bit| combo & (1 << bit) != 0)
        .map(|bit| format!("FN{}", bit + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::commands::parse_meta_match;
    use crate::assembler::CompilerContext;
    use crate::text::Tokenizer;

    fn assemble_match(text: &str) -> (u8, u8) {
        let ctx = CompilerContext::default();
        let (d, m) = parse_meta_match(&ctx, Tokenizer::new(text)).expect("valid modifiers");
        (d.0, m.0)
    }

    #[test]
    fn test_meta_match_simple_cases() {
        let render = |d, m| render_meta_match(ModifierMask(d), ModifierMask(m)).unwrap().join(" ");
        assert_eq!(render(0x01, 0x01), "LCTRL");
        assert_eq!(render(0x11, 0x01), "CTRL");
        assert_eq!(render(0x00, 0x22), "-SHIFT");
        assert_eq!(render(0x10, 0x01), "CTRL -LCTRL");
        assert_eq!(render(0x11, 0x11), "LCTRL RCTRL");
        assert_eq!(render(0x00, 0x00), "");
    }

    #[test]
    fn test_every_reachable_meta_match_renders_to_equivalent_text() {
        // Arrange: every sequence of up to three tokens touching the CTRL pair,
        // combined with a fixed SHIFT/ALT/GUI part.
        let pair_tokens = ["CTRL", "-CTRL", "LCTRL", "-LCTRL", "RCTRL", "-RCTRL"];
        let mut sequences: Vec<Vec<&str>> = vec![vec![]];
        for _ in 0..3 {
            let longer: Vec<Vec<&str>> = sequences
                .iter()
                .flat_map(|seq| {
                    pair_tokens.iter().map(move |t| {
                        let mut s = seq.clone();
                        s.push(t);
                        s
                    })
                })
                .collect();
            sequences.extend(longer);
        }
        sequences.sort();
        sequences.dedup();

        for seq in sequences {
            let text = format!("{} -LSHIFT ALT RGUI", seq.join(" "));
            let (d, m) = assemble_match(&text);

            // Act
            let rendered = render_meta_match(ModifierMask(d), ModifierMask(m))
                .unwrap_or_else(|e| panic!("{text:?} gave unrenderable state: {e}"));

            // Assert
            assert_eq!(assemble_match(&rendered.join(" ")), (d, m), "{text:?}");
        }
    }

    #[test]
    fn test_renderable_meta_match_states_round_trip_exhaustively() {
        for d in 0..=u8::MAX {
            for m in 0..=u8::MAX {
                if let Ok(tokens) = render_meta_match(ModifierMask(d), ModifierMask(m)) {
                    assert_eq!(assemble_match(&tokens.join(" ")), (d, m), "{d:02X} {m:02X}");
                }
            }
        }
    }

    #[test]
    fn test_unreachable_meta_match_is_reported() {
        // Left bit desired but not matched.
        assert!(render_meta_match(ModifierMask(0x01), ModifierMask(0x00)).is_err());
        // Right bit desired, nothing matched.
        assert!(render_meta_match(ModifierMask(0x10), ModifierMask(0x00)).is_err());
    }

    #[test]
    fn test_step_metas_prefer_generic_names() {
        assert_eq!(render_step_metas(ModifierMask(0x11)), vec!["CTRL"]);
        assert_eq!(render_step_metas(ModifierMask(0x42)), vec!["LSHIFT", "RALT"]);
        assert_eq!(render_step_metas(ModifierMask(0xFF)), vec!["CTRL", "SHIFT", "ALT", "GUI"]);
        assert!(render_step_metas(ModifierMask(0)).is_empty());
    }

    #[test]
    fn test_render_step_by_argument_class() {
        assert_eq!(render_step(0x01, 0x05).unwrap(), "PRESS B");
        assert_eq!(render_step(0x85, 0x42).unwrap(), "PUSH_META SET_META LSHIFT RALT");
        assert_eq!(render_step(0x0A, 200).unwrap(), "DELAY 200");
        assert_eq!(render_step(0x08, 0).unwrap(), "POP_META");
        assert_eq!(render_step(0x06, 0).unwrap(), "CLEAR_META");
    }

    #[test]
    fn test_render_error_messages() {
        assert_eq!(RenderError::UnknownCommand(0x0D).to_string(), "unknown macro command 0x0D");
        assert_eq!(
            RenderError::IgnoredValue {
                command: "BOOT",
                value: 1
            }
            .to_string(),
            "BOOT takes no argument but carries 0x01"
        );
        let err: Box<dyn std::error::Error> = Box::new(RenderError::UnnamedKey(0xFF));
        assert_eq!(err.to_string(), "unnamed key code 0xFF");
    }

    #[test]
    fn test_render_step_errors() {
        assert_eq!(render_step(0x0D, 0), Err(RenderError::UnknownCommand(0x0D)));
        assert_eq!(render_step(0x01, 0xFF), Err(RenderError::UnnamedKey(0xFF)));
        assert_eq!(
            render_step(0x0C, 1),
            Err(RenderError::IgnoredValue {
                command: "BOOT",
                value: 1
            })
        );
    }

    #[test]
    fn test_render_scanset_and_fn_combo() {
        assert_eq!(render_scanset(0), "any");
        assert_eq!(render_scanset(0b1011), "set1 set2 set2ext");
        assert_eq!(render_fn_combo(0b1000_0101), vec!["FN1", "FN3", "FN8"]);
    }
}
