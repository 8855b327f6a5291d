//! Directive handlers and block-body grammars.
//!
//! The first token of every line is looked up in [`DIRECTIVES`].  A miss is
//! not an error by itself: inside a block the line is a body line (a layer
//! definition, a remap pair or a macro step) and goes to [`block_line`] with
//! the tokenizer still positioned on the first token.

use tracing::debug;

use crate::assembler::context::{CompilerContext, MacroInProgress, MacroPhase};
use crate::assembler::error::{CompileError, ErrorKind};
use crate::domain::{BlockKind, LayerDef, Macro, MacroStep, Remap};
use crate::format::encode::{encode_layerdef_block, encode_macro_block, encode_remap_block};
use crate::format::layout::MAX_PHASE_STEPS;
use crate::format::ForceFlags;
use crate::text::Tokenizer;
use crate::tokens::{
    key_code_for, macro_command_for, modifier_for, protocol_for, scan_set_for, ArgClass, KeyCode,
    ModifierMask, PUSH_META_TOKEN,
};

/// Signature shared by every directive handler.  The tokenizer is positioned
/// after the directive name.
pub type Handler = fn(&mut CompilerContext, &mut Tokenizer<'_>) -> Result<(), CompileError>;

static DIRECTIVES: &[(&str, Handler)] = &[
    ("force", cmd_force),
    ("include", cmd_include),
    ("ifselect", cmd_ifselect),
    ("ifset", cmd_ifset),
    ("ifkeyboard", cmd_ifkeyboard),
    ("remapblock", cmd_remapblock),
    ("layerblock", cmd_layerblock),
    ("macroblock", cmd_macroblock),
    ("layer", cmd_layer),
    ("macro", cmd_macro),
    ("onbreak", cmd_onbreak),
    ("endmacro", cmd_endmacro),
    ("endblock", cmd_endblock),
];

pub fn find_directive(name: &str) -> Option<Handler> {
    DIRECTIVES
        .iter()
        .find(|(directive, _)| *directive == name)
        .map(|&(_, handler)| handler)
}

// ── Argument helpers ──────────────────────────────────────────────────────────

fn invalid_args(ctx: &CompilerContext, detail: impl Into<String>) -> CompileError {
    ctx.error(ErrorKind::InvalidArguments, detail)
}

fn invalid_command(ctx: &CompilerContext, detail: impl Into<String>) -> CompileError {
    ctx.error(ErrorKind::InvalidCommand, detail)
}

fn expect_arg<'a>(
    ctx: &CompilerContext,
    tokens: &mut Tokenizer<'a>,
    what: &str,
) -> Result<&'a str, CompileError> {
    tokens
        .advance()
        .ok_or_else(|| invalid_args(ctx, format!("missing {what}")))
}

fn expect_end(ctx: &CompilerContext, tokens: &Tokenizer<'_>) -> Result<(), CompileError> {
    match tokens.peek() {
        None => Ok(()),
        Some(extra) => Err(invalid_args(ctx, format!("unexpected argument `{extra}`"))),
    }
}

/// Plain decimal only: `str::parse` would also take a leading `+`.
fn starts_with_digit(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit())
}

fn parse_number(ctx: &CompilerContext, token: &str, min: u8, max: u8) -> Result<u8, CompileError> {
    Some(token)
        .filter(|t| starts_with_digit(t))
        .and_then(|t| t.parse::<u32>().ok())
        .filter(|n| (u32::from(min)..=u32::from(max)).contains(n))
        .map(|n| n as u8)
        .ok_or_else(|| invalid_args(ctx, format!("expected a number {min}-{max}, got `{token}`")))
}

fn parse_key(ctx: &CompilerContext, token: &str) -> Result<KeyCode, CompileError> {
    key_code_for(token).ok_or_else(|| invalid_args(ctx, format!("unknown key `{token}`")))
}

fn parse_modifier(ctx: &CompilerContext, token: &str) -> Result<ModifierMask, CompileError> {
    modifier_for(token).ok_or_else(|| invalid_args(ctx, format!("unknown modifier `{token}`")))
}

/// Parses a keyboard id: hexadecimal, optional `0x` prefix, 0001–FFFF.
fn parse_keyboard_id(token: &str) -> Option<u16> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if !digits.starts_with(|c: char| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok().filter(|&id| id != 0)
}

/// `FN1`..`FN8` → 1..8.
fn parse_function_key(token: &str) -> Option<u8> {
    token
        .strip_prefix("FN")
        .filter(|n| starts_with_digit(n))
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=8).contains(n))
}

/// Parses the modifier match of a `macro` line.
///
/// A bare name requires the modifier: it is added to `desired`, and to
/// `matched` either whole (side-specific names) or as its left-hand bits
/// only, so `CTRL` matches either control key.  A `-` prefix requires the
/// modifier to be up: it is removed from `desired` and added whole to
/// `matched`.  Tokens apply left to right.
pub fn parse_meta_match<'a>(
    ctx: &CompilerContext,
    tokens: impl Iterator<Item = &'a str>,
) -> Result<(ModifierMask, ModifierMask), CompileError> {
    let mut desired = 0u8;
    let mut matched = 0u8;

    for token in tokens {
        match token.strip_prefix('-') {
            Some(name) => {
                let mask = parse_modifier(ctx, name)?;
                desired &= !mask.0;
                matched |= mask.0;
            }
            None => {
                let mask = parse_modifier(ctx, token)?;
                desired |= mask.0;
                matched |= if mask.is_side_specific() {
                    mask.0
                } else {
                    mask.left().0
                };
            }
        }
    }

    Ok((ModifierMask(desired), ModifierMask(matched)))
}

// ── Header and condition directives ───────────────────────────────────────────

fn cmd_force(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let first = expect_arg(ctx, tokens, "scan set or protocol")?;
    for token in std::iter::once(first).chain(tokens.by_ref()) {
        ctx.force = if token == "any" || token == "none" {
            ForceFlags::default()
        } else if let Some(set) = scan_set_for(token) {
            ctx.force.with_scan_set(set)
        } else if let Some(protocol) = protocol_for(token) {
            ctx.force.with_protocol(protocol)
        } else {
            return Err(invalid_args(
                ctx,
                format!("unknown scan set or protocol `{token}`"),
            ));
        };
    }
    Ok(())
}

fn cmd_include(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let path = expect_arg(ctx, tokens, "file name")?;
    expect_end(ctx, tokens)?;
    ctx.include(path)
}

fn cmd_ifselect(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let token = expect_arg(ctx, tokens, "select value")?;
    let select = if token == "any" {
        0
    } else {
        parse_number(ctx, token, 1, 7)?
    };
    expect_end(ctx, tokens)?;
    ctx.conditions.select = select;
    Ok(())
}

fn cmd_ifset(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let first = expect_arg(ctx, tokens, "scan set")?;
    let mut mask = 0u8;
    for token in std::iter::once(first).chain(tokens.by_ref()) {
        if token == "any" {
            mask = 0;
        } else {
            let set = scan_set_for(token)
                .ok_or_else(|| invalid_args(ctx, format!("unknown scan set `{token}`")))?;
            mask |= set.condition_bit();
        }
    }
    ctx.conditions.scanset = mask;
    Ok(())
}

fn cmd_ifkeyboard(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let token = expect_arg(ctx, tokens, "keyboard id")?;
    let id = if token == "any" {
        0
    } else {
        parse_keyboard_id(token).ok_or_else(|| {
            invalid_args(ctx, format!("expected a hex keyboard id 0001-FFFF, got `{token}`"))
        })?
    };
    expect_end(ctx, tokens)?;
    ctx.conditions.keyboard_id = id;
    Ok(())
}

fn cmd_layer(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let token = expect_arg(ctx, tokens, "layer number")?;
    let layer = parse_number(ctx, token, 0, 255)?;
    expect_end(ctx, tokens)?;
    ctx.layer = layer;
    Ok(())
}

// ── Blocks ────────────────────────────────────────────────────────────────────

fn open_block(
    ctx: &mut CompilerContext,
    tokens: &mut Tokenizer<'_>,
    kind: BlockKind,
) -> Result<(), CompileError> {
    if let Some(open) = ctx.open_block {
        return Err(invalid_command(
            ctx,
            format!("{} inside an open {}", kind.directive(), open.directive()),
        ));
    }
    expect_end(ctx, tokens)?;
    ctx.open_block = Some(kind);
    Ok(())
}

fn cmd_layerblock(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    open_block(ctx, tokens, BlockKind::LayerDef)
}

fn cmd_remapblock(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    open_block(ctx, tokens, BlockKind::Remap)
}

fn cmd_macroblock(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    open_block(ctx, tokens, BlockKind::Macro)
}

fn cmd_endblock(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let Some(kind) = ctx.open_block else {
        return Err(invalid_command(ctx, "endblock without an open block"));
    };
    if ctx.open_macro.is_some() {
        return Err(invalid_command(ctx, "endblock before endmacro"));
    }
    expect_end(ctx, tokens)?;

    let encoded = match kind {
        BlockKind::LayerDef => encode_layerdef_block(&ctx.conditions, &ctx.lists.layerdefs),
        BlockKind::Remap => encode_remap_block(&ctx.conditions, ctx.layer, &ctx.lists.remaps),
        BlockKind::Macro => encode_macro_block(&ctx.conditions, &ctx.lists.macros),
    };
    let block = encoded.map_err(|e| ctx.error(ErrorKind::from(&e), e.to_string()))?;
    ctx.push_block(block);
    Ok(())
}

// ── Macros ────────────────────────────────────────────────────────────────────

fn cmd_macro(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    if ctx.open_block != Some(BlockKind::Macro) {
        return Err(invalid_command(ctx, "macro outside a macroblock"));
    }
    if ctx.open_macro.is_some() {
        return Err(invalid_command(ctx, "macro before endmacro of the previous macro"));
    }

    let key_token = expect_arg(ctx, tokens, "macro key")?;
    let key = parse_key(ctx, key_token)?;
    let (desired, matched) = parse_meta_match(ctx, tokens.by_ref())?;

    ctx.lists.clear_macro();
    ctx.open_macro = Some(MacroInProgress {
        key,
        desired,
        matched,
        phase: MacroPhase::Press,
        restore_meta: true,
    });
    Ok(())
}

fn cmd_onbreak(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let restore_meta = match tokens.advance() {
        None => true,
        Some("norestoremeta") => false,
        Some(other) => {
            return Err(invalid_command(ctx, format!("unknown onbreak option `{other}`")))
        }
    };
    expect_end(ctx, tokens)?;

    match ctx.open_macro.as_ref().map(|m| m.phase) {
        None => Err(invalid_command(ctx, "onbreak outside a macro")),
        Some(MacroPhase::Release) => Err(invalid_command(ctx, "onbreak used twice in one macro")),
        Some(MacroPhase::Press) => {
            if let Some(m) = ctx.open_macro.as_mut() {
                m.phase = MacroPhase::Release;
                m.restore_meta = restore_meta;
            }
            Ok(())
        }
    }
}

fn cmd_endmacro(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    expect_end(ctx, tokens)?;
    let Some(open) = ctx.open_macro.take() else {
        return Err(invalid_command(ctx, "endmacro without macro"));
    };

    for (phase, steps) in [("press", &ctx.lists.press), ("release", &ctx.lists.release)] {
        if steps.len() > MAX_PHASE_STEPS {
            return Err(ctx.error(
                ErrorKind::MacroTooLong,
                format!(
                    "{} {phase} steps, at most {MAX_PHASE_STEPS} allowed",
                    steps.len()
                ),
            ));
        }
    }

    let m = Macro {
        key: open.key,
        desired: open.desired,
        matched: open.matched,
        press: std::mem::take(&mut ctx.lists.press),
        release: std::mem::take(&mut ctx.lists.release),
        restore_meta: open.restore_meta,
    };
    debug!(
        key = m.key.name(),
        press = m.press.len(),
        release = m.release.len(),
        "macro finalized"
    );
    ctx.lists.macros.push(m);
    Ok(())
}

// ── Block bodies ──────────────────────────────────────────────────────────────

/// Handles a line whose first token is not a directive.
pub fn block_line(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    match ctx.open_block {
        Some(BlockKind::LayerDef) => layerdef_line(ctx, tokens),
        Some(BlockKind::Remap) => remap_line(ctx, tokens),
        Some(BlockKind::Macro) => macro_step_line(ctx, tokens),
        None => {
            let name = tokens.peek().unwrap_or_default();
            Err(invalid_command(ctx, format!("unknown command `{name}`")))
        }
    }
}

/// `FN<1-8>... <layer 1-255>`
fn layerdef_line(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let mut fn_combo = 0u8;
    while let Some(n) = tokens.peek().and_then(parse_function_key) {
        fn_combo |= 1 << (n - 1);
        tokens.advance();
    }
    if fn_combo == 0 {
        let found = tokens.peek().unwrap_or_default();
        return Err(invalid_args(ctx, format!("expected FN1-FN8, got `{found}`")));
    }

    let token = expect_arg(ctx, tokens, "layer number")?;
    let layer = parse_number(ctx, token, 1, 255)?;
    expect_end(ctx, tokens)?;

    ctx.lists.layerdefs.push(LayerDef { fn_combo, layer });
    Ok(())
}

/// `<from key> <to key>`
fn remap_line(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let from = expect_arg(ctx, tokens, "source key")?;
    let from = parse_key(ctx, from)?;
    let to = expect_arg(ctx, tokens, "target key")?;
    let to = parse_key(ctx, to)?;
    expect_end(ctx, tokens)?;

    ctx.lists.remaps.push(Remap { from, to });
    Ok(())
}

/// `[PUSH_META] <COMMAND> [argument]`
fn macro_step_line(ctx: &mut CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<(), CompileError> {
    let Some(phase) = ctx.open_macro.as_ref().map(|m| m.phase) else {
        let name = tokens.peek().unwrap_or_default();
        return Err(invalid_command(
            ctx,
            format!("`{name}` is not a directive and no macro is open"),
        ));
    };

    let step = parse_step(ctx, tokens)?;
    match phase {
        MacroPhase::Press => ctx.lists.press.push(step),
        MacroPhase::Release => ctx.lists.release.push(step),
    }
    Ok(())
}

fn parse_step(ctx: &CompilerContext, tokens: &mut Tokenizer<'_>) -> Result<MacroStep, CompileError> {
    let mut token = expect_arg(ctx, tokens, "macro command")?;
    let push_meta = token == PUSH_META_TOKEN;
    if push_meta {
        token = expect_arg(ctx, tokens, "macro command after PUSH_META")?;
    }

    let command = macro_command_for(token)
        .ok_or_else(|| invalid_args(ctx, format!("unknown macro command `{token}`")))?;

    let value = match command.argument_class() {
        ArgClass::None => 0,
        ArgClass::Key => {
            let key = expect_arg(ctx, tokens, "key")?;
            parse_key(ctx, key)?.0
        }
        ArgClass::Modifier => {
            let mut mask = ModifierMask::empty();
            for name in tokens.by_ref() {
                mask |= parse_modifier(ctx, name)?;
            }
            mask.0
        }
        ArgClass::Delay => {
            let delay = expect_arg(ctx, tokens, "delay")?;
            parse_number(ctx, delay, 0, 255)?
        }
    };
    expect_end(ctx, tokens)?;

    Ok(MacroStep {
        command,
        push_meta,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::MacroCommand;

    fn ctx() -> CompilerContext {
        CompilerContext::new(Vec::new())
    }

    fn run(ctx: &mut CompilerContext, line: &str) -> Result<(), CompileError> {
        let mut tokens = Tokenizer::new(line);
        let first = tokens.peek().expect("non-empty line");
        match find_directive(first) {
            Some(handler) => {
                tokens.advance();
                handler(ctx, &mut tokens)
            }
            None => block_line(ctx, &mut tokens),
        }
    }

    fn kind_of(result: Result<(), CompileError>) -> ErrorKind {
        match result {
            Err(CompileError::Line { kind, .. }) => kind,
            other => panic!("expected a line error, got {other:?}"),
        }
    }

    fn match_of(line: &str) -> (u8, u8) {
        let ctx = ctx();
        let (d, m) = parse_meta_match(&ctx, Tokenizer::new(line)).expect("valid match");
        (d.0, m.0)
    }

    #[test]
    fn test_every_directive_is_registered() {
        for name in [
            "force",
            "include",
            "ifselect",
            "ifset",
            "ifkeyboard",
            "remapblock",
            "layerblock",
            "macroblock",
            "layer",
            "macro",
            "onbreak",
            "endmacro",
            "endblock",
        ] {
            assert!(find_directive(name).is_some(), "{name}");
        }
        assert!(find_directive("PRESS").is_none());
        assert!(find_directive("Force").is_none());
    }

    #[test]
    fn test_meta_match_bare_names() {
        assert_eq!(match_of("LCTRL"), (0x01, 0x01));
        assert_eq!(match_of("CTRL"), (0x11, 0x01));
        assert_eq!(match_of("CTRL RSHIFT"), (0x31, 0x21));
        assert_eq!(match_of(""), (0x00, 0x00));
    }

    #[test]
    fn test_meta_match_inverted_names() {
        assert_eq!(match_of("-SHIFT"), (0x00, 0x22));
        assert_eq!(match_of("LCTRL -RCTRL"), (0x01, 0x11));
        // Order matters: a later inversion clears an earlier requirement.
        assert_eq!(match_of("CTRL -LCTRL"), (0x10, 0x01));
    }

    #[test]
    fn test_meta_match_rejects_unknown_names() {
        let ctx = ctx();
        let result = parse_meta_match(&ctx, Tokenizer::new("LCTRL -HYPER"));
        assert!(matches!(
            result,
            Err(CompileError::Line {
                kind: ErrorKind::InvalidArguments,
                ..
            })
        ));
    }

    #[test]
    fn test_force_sets_each_nibble_and_any_clears() {
        // Arrange
        let mut c = ctx();

        // Act / Assert
        run(&mut c, "force set2ext").unwrap();
        assert_eq!(c.force.0, 0x04);
        run(&mut c, "force at").unwrap();
        assert_eq!(c.force.0, 0x24);
        run(&mut c, "force set1 xt").unwrap();
        assert_eq!(c.force.0, 0x11);
        run(&mut c, "force any").unwrap();
        assert_eq!(c.force.0, 0x00);
        assert_eq!(kind_of(run(&mut c, "force set9")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "force")), ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_ifselect_values() {
        let mut c = ctx();
        run(&mut c, "ifselect 7").unwrap();
        assert_eq!(c.conditions.select, 7);
        run(&mut c, "ifselect any").unwrap();
        assert_eq!(c.conditions.select, 0);
        assert_eq!(kind_of(run(&mut c, "ifselect 0")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "ifselect 8")), ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_ifset_builds_mask_and_any_resets() {
        let mut c = ctx();
        run(&mut c, "ifset set1 set2ext").unwrap();
        assert_eq!(c.conditions.scanset, 0b1001);
        run(&mut c, "ifset any").unwrap();
        assert_eq!(c.conditions.scanset, 0);
        run(&mut c, "ifset set3 any set2").unwrap();
        assert_eq!(c.conditions.scanset, 0b0010);
        assert_eq!(kind_of(run(&mut c, "ifset at")), ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_ifkeyboard_parses_hex() {
        let mut c = ctx();
        run(&mut c, "ifkeyboard AB").unwrap();
        assert_eq!(c.conditions.keyboard_id, 0x00AB);
        run(&mut c, "ifkeyboard 0xFFFF").unwrap();
        assert_eq!(c.conditions.keyboard_id, 0xFFFF);
        run(&mut c, "ifkeyboard any").unwrap();
        assert_eq!(c.conditions.keyboard_id, 0);
        assert_eq!(kind_of(run(&mut c, "ifkeyboard 0")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "ifkeyboard 10000")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "ifkeyboard XYZ")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "ifkeyboard +FF")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "ifkeyboard 0x+FF")), ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_layer_range() {
        let mut c = ctx();
        run(&mut c, "layer 0").unwrap();
        run(&mut c, "layer 255").unwrap();
        assert_eq!(c.layer, 255);
        assert_eq!(kind_of(run(&mut c, "layer 256")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "layer -1")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "layer +2")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "ifselect +3")), ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_unknown_command_outside_block_is_invalid_command() {
        let mut c = ctx();
        assert_eq!(kind_of(run(&mut c, "A B")), ErrorKind::InvalidCommand);
    }

    #[test]
    fn test_nested_block_is_invalid_command() {
        let mut c = ctx();
        run(&mut c, "remapblock").unwrap();
        assert_eq!(kind_of(run(&mut c, "macroblock")), ErrorKind::InvalidCommand);
    }

    #[test]
    fn test_layerdef_line_builds_combo() {
        // Arrange
        let mut c = ctx();
        run(&mut c, "layerblock").unwrap();

        // Act
        run(&mut c, "FN1 FN3 2").unwrap();

        // Assert
        assert_eq!(
            c.lists.layerdefs,
            vec![LayerDef {
                fn_combo: 0b101,
                layer: 2
            }]
        );
        assert_eq!(kind_of(run(&mut c, "3")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "FN9 1")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "FN1 0")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "FN+1 1")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "FN1 +1")), ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_remap_line_requires_two_known_keys() {
        let mut c = ctx();
        run(&mut c, "remapblock").unwrap();
        run(&mut c, "CAPSLOCK ESC").unwrap();
        assert_eq!(c.lists.remaps.len(), 1);
        assert_eq!(kind_of(run(&mut c, "CAPSLOCK")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "CAPSLOCK NOPE")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "A B C")), ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_macro_step_arguments_by_class() {
        // Arrange
        let mut c = ctx();
        run(&mut c, "macroblock").unwrap();
        run(&mut c, "macro A").unwrap();

        // Act
        run(&mut c, "PRESS B").unwrap();
        run(&mut c, "PUSH_META SET_META LSHIFT RALT").unwrap();
        run(&mut c, "DELAY 250").unwrap();
        run(&mut c, "POP_META").unwrap();
        run(&mut c, "CLEAR_META").unwrap();

        // Assert
        let steps: Vec<(u8, u8)> = c
            .lists
            .press
            .iter()
            .map(|s| (s.command_byte(), s.value))
            .collect();
        assert_eq!(
            steps,
            vec![(0x01, 0x05), (0x85, 0x42), (0x0A, 250), (0x08, 0), (0x06, 0)]
        );
    }

    #[test]
    fn test_macro_step_errors() {
        let mut c = ctx();
        run(&mut c, "macroblock").unwrap();
        assert_eq!(kind_of(run(&mut c, "PRESS A")), ErrorKind::InvalidCommand);
        run(&mut c, "macro A").unwrap();
        assert_eq!(kind_of(run(&mut c, "JUMP A")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "PRESS")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "DELAY 256")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "BOOT now")), ErrorKind::InvalidArguments);
        assert_eq!(kind_of(run(&mut c, "PUSH_META")), ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_macro_sequence_errors() {
        let mut c = ctx();
        assert_eq!(kind_of(run(&mut c, "macro A")), ErrorKind::InvalidCommand);
        run(&mut c, "macroblock").unwrap();
        assert_eq!(kind_of(run(&mut c, "onbreak")), ErrorKind::InvalidCommand);
        assert_eq!(kind_of(run(&mut c, "endmacro")), ErrorKind::InvalidCommand);
        run(&mut c, "macro A").unwrap();
        assert_eq!(kind_of(run(&mut c, "macro B")), ErrorKind::InvalidCommand);
        assert_eq!(kind_of(run(&mut c, "onbreak maybe")), ErrorKind::InvalidCommand);
        run(&mut c, "onbreak norestoremeta").unwrap();
        assert_eq!(kind_of(run(&mut c, "onbreak")), ErrorKind::InvalidCommand);
        assert_eq!(kind_of(run(&mut c, "endblock")), ErrorKind::InvalidCommand);
        run(&mut c, "endmacro").unwrap();
        run(&mut c, "endblock").unwrap();
        assert_eq!(c.blocks.len(), 1);
    }

    #[test]
    fn test_endmacro_rejects_64_steps() {
        // Arrange
        let mut c = ctx();
        run(&mut c, "macroblock").unwrap();
        run(&mut c, "macro A").unwrap();
        for _ in 0..64 {
            run(&mut c, "NOP").unwrap();
        }

        // Act
        let result = run(&mut c, "endmacro");

        // Assert
        assert_eq!(kind_of(result), ErrorKind::MacroTooLong);
    }

    #[test]
    fn test_endblock_clears_working_lists_and_keeps_conditions() {
        // Arrange
        let mut c = ctx();
        run(&mut c, "ifselect 3").unwrap();
        run(&mut c, "remapblock").unwrap();
        run(&mut c, "A B").unwrap();

        // Act
        run(&mut c, "endblock").unwrap();

        // Assert
        assert!(c.lists.remaps.is_empty());
        assert_eq!(c.open_block, None);
        assert_eq!(c.conditions.select, 3);
        assert_eq!(c.blocks[0].bytes, vec![6, 0x19, 0, 1, 0x04, 0x05]);
    }

    #[test]
    fn test_endmacro_moves_steps_into_macro() {
        let mut c = ctx();
        run(&mut c, "macroblock").unwrap();
        run(&mut c, "macro A CTRL").unwrap();
        run(&mut c, "PRESS B").unwrap();
        run(&mut c, "onbreak").unwrap();
        run(&mut c, "BREAK B").unwrap();
        run(&mut c, "endmacro").unwrap();

        let m = &c.lists.macros[0];
        assert_eq!(m.desired, ModifierMask(0x11));
        assert_eq!(m.matched, ModifierMask(0x01));
        assert_eq!(m.press, vec![MacroStep::new(MacroCommand::Press, 0x05)]);
        assert_eq!(m.release, vec![MacroStep::new(MacroCommand::Break, 0x05)]);
        assert!(c.lists.press.is_empty() && c.lists.release.is_empty());
    }
}
