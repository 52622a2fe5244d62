//! `#[query(...)]` attribute parsing.

use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, Meta, Result, Token,
};

/// How Rust identifiers map to query member names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenameRule {
    #[default]
    None,
    CamelCase,
    SnakeCase,
    PascalCase,
}

impl RenameRule {
    fn from_str(s: &str, span: Span) -> Result<Self> {
        match s {
            "camelCase" => Ok(RenameRule::CamelCase),
            "snake_case" => Ok(RenameRule::SnakeCase),
            "PascalCase" => Ok(RenameRule::PascalCase),
            other => Err(Error::new(
                span,
                format!(
                    "unknown rename rule: '{other}'. Expected one of: camelCase, snake_case, PascalCase"
                ),
            )),
        }
    }

    pub fn apply(self, name: &str) -> String {
        match self {
            RenameRule::None => name.to_string(),
            RenameRule::CamelCase => name.to_lower_camel_case(),
            RenameRule::SnakeCase => name.to_snake_case(),
            RenameRule::PascalCase => name.to_pascal_case(),
        }
    }
}

/// Container-level `#[query(rename_all = "...")]`.
#[derive(Debug, Default)]
pub struct ContainerAttr {
    pub rename_all: RenameRule,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                    let (rule, span) = string_literal(&nv.value, "rename_all")?;
                    attr.rename_all = RenameRule::from_str(&rule, span)?;
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected: rename_all = \"...\"",
                    ))
                }
            }
        }

        Ok(attr)
    }
}

/// Field- or variant-level `#[query(rename = "...")]` / `#[query(skip)]`.
#[derive(Debug, Default)]
pub struct FieldAttr {
    pub rename: Option<String>,
    pub skip: bool,
    pub span: Option<Span>,
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                    attr.span = Some(p.span());
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    let (name, span) = string_literal(&nv.value, "rename")?;
                    if name.trim().is_empty() || name.contains('.') {
                        return Err(Error::new(
                            span,
                            "rename must be a non-empty name without '.'",
                        ));
                    }
                    attr.rename = Some(name);
                    attr.span = Some(span);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected: skip or rename = \"...\"",
                    ))
                }
            }
        }

        Ok(attr)
    }
}

fn string_literal(expr: &Expr, what: &str) -> Result<(String, Span)> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok((s.value(), s.span())),
        other => Err(Error::new(
            other.span(),
            format!("{what} must be a string literal"),
        )),
    }
}

pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    match attrs.iter().find(|a| a.path().is_ident("query")) {
        Some(attr) => attr.parse_args::<ContainerAttr>(),
        None => Ok(ContainerAttr::default()),
    }
}

pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    match attrs.iter().find(|a| a.path().is_ident("query")) {
        Some(attr) => attr.parse_args::<FieldAttr>(),
        None => Ok(FieldAttr::default()),
    }
}
