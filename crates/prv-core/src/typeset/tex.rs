//! Unicode renderer for the TeX subset the Proover backend emits.
//!
//! Proofs pretty-print with a small vocabulary (`\forall`, `\land`, `\to`,
//! Greek letters, sub/superscripts), all of which have Unicode forms that
//! read well in a terminal. Anything outside that vocabulary is a span-level
//! error so the caller can fall back to the literal text.

use super::{TypesetError, Typesetter};

/// Renders math spans as plain Unicode text.
pub struct UnicodeTex;

impl Typesetter for UnicodeTex {
    fn render(&self, source: &str, _display: bool) -> Result<String, TypesetError> {
        render_source(source)
    }
}

fn render_source(source: &str) -> Result<String, TypesetError> {
    let mut out = String::new();
    let mut chars = source.chars().peekable();
    let mut depth: usize = 0;

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some(next) if next.is_ascii_alphabetic() => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_alphabetic() {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    out.push_str(
                        symbol(&name).ok_or_else(|| TypesetError::UnknownCommand(name.clone()))?,
                    );
                }
                Some('\\') => {
                    chars.next();
                    out.push('\n');
                }
                Some(&other) => {
                    // Escaped punctuation: \{ \} \$ \, etc. pass through.
                    chars.next();
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1).ok_or(TypesetError::UnbalancedBraces)?;
            }
            '^' => render_script(&mut chars, &mut out, superscript)?,
            '_' => render_script(&mut chars, &mut out, subscript)?,
            other => out.push(other),
        }
    }

    if depth != 0 {
        return Err(TypesetError::UnbalancedBraces);
    }
    Ok(out)
}

/// Renders a `^` or `_` argument: either a single atom or a braced group.
fn render_script(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    out: &mut String,
    map: fn(char) -> Option<char>,
) -> Result<(), TypesetError> {
    let atoms: Vec<char> = match chars.next() {
        Some('{') => {
            let mut group = Vec::new();
            for c in chars.by_ref() {
                if c == '}' {
                    return push_mapped(&group, out, map);
                }
                group.push(c);
            }
            return Err(TypesetError::UnbalancedBraces);
        }
        Some(single) => vec![single],
        None => return Err(TypesetError::UnbalancedBraces),
    };
    push_mapped(&atoms, out, map)
}

fn push_mapped(
    atoms: &[char],
    out: &mut String,
    map: fn(char) -> Option<char>,
) -> Result<(), TypesetError> {
    for &c in atoms {
        out.push(map(c).ok_or(TypesetError::UnsupportedScript(c))?);
    }
    Ok(())
}

fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        _ => return None,
    })
}

fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        _ => return None,
    })
}

/// Command-name to Unicode lookup.
fn symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        // Logic
        "forall" => "∀",
        "exists" => "∃",
        "land" | "wedge" => "∧",
        "lor" | "vee" => "∨",
        "lnot" | "neg" => "¬",
        "to" | "rightarrow" => "→",
        "implies" | "Rightarrow" => "⇒",
        "iff" | "Leftrightarrow" => "⇔",
        "leftrightarrow" => "↔",
        "mapsto" => "↦",
        "vdash" => "⊢",
        "dashv" => "⊣",
        "models" | "vDash" => "⊨",
        "top" => "⊤",
        "bot" => "⊥",
        // Relations
        "neq" | "ne" => "≠",
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "equiv" => "≡",
        "approx" => "≈",
        "sim" => "∼",
        "in" => "∈",
        "notin" => "∉",
        "subset" => "⊂",
        "subseteq" => "⊆",
        "supset" => "⊃",
        "supseteq" => "⊇",
        // Sets and operators
        "cup" => "∪",
        "cap" => "∩",
        "setminus" => "∖",
        "emptyset" | "varnothing" => "∅",
        "infty" => "∞",
        "partial" => "∂",
        "nabla" => "∇",
        "times" => "×",
        "cdot" => "⋅",
        "div" => "÷",
        "pm" => "±",
        "circ" => "∘",
        "oplus" => "⊕",
        "otimes" => "⊗",
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "sqrt" => "√",
        // Brackets and spacing
        "langle" => "⟨",
        "rangle" => "⟩",
        "ldots" | "dots" => "…",
        "cdots" => "⋯",
        "left" | "right" => "",
        "quad" => "  ",
        "qquad" => "    ",
        // Greek
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" | "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" => "θ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" | "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> Result<String, TypesetError> {
        UnicodeTex.render(source, false)
    }

    #[test]
    fn quantified_formula() {
        // The shape the backend pretty-printer emits for proofs.
        assert_eq!(
            render("\\forall x. \\exists y. (x = y)").unwrap(),
            "∀ x. ∃ y. (x = y)"
        );
    }

    #[test]
    fn connectives_and_turnstile() {
        assert_eq!(
            render("\\Gamma \\vdash (P \\land Q) \\to P").unwrap(),
            "Γ ⊢ (P ∧ Q) → P"
        );
    }

    #[test]
    fn braces_group_without_output() {
        assert_eq!(render("{a}{b}").unwrap(), "ab");
    }

    #[test]
    fn unbalanced_braces_rejected() {
        assert_eq!(render("{a"), Err(TypesetError::UnbalancedBraces));
        assert_eq!(render("a}"), Err(TypesetError::UnbalancedBraces));
    }

    #[test]
    fn unknown_command_rejected() {
        assert_eq!(
            render("\\frac{1}{2}"),
            Err(TypesetError::UnknownCommand("frac".into()))
        );
    }

    #[test]
    fn scripts_map_to_unicode_forms() {
        assert_eq!(render("x^2 + y_1").unwrap(), "x² + y₁");
        assert_eq!(render("x^{10}").unwrap(), "x¹⁰");
        assert_eq!(render("a_{ij}").unwrap(), "aᵢⱼ");
    }

    #[test]
    fn unsupported_script_rejected() {
        assert_eq!(render("x^z"), Err(TypesetError::UnsupportedScript('z')));
    }

    #[test]
    fn escaped_punctuation_passes_through() {
        assert_eq!(render("\\{1, 2\\}").unwrap(), "{1, 2}");
    }

    #[test]
    fn double_backslash_breaks_line() {
        assert_eq!(render("a \\\\ b").unwrap(), "a \n b");
    }
}
