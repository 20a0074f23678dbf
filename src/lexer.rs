// パス: src/lexer.rs
// 役割: REPL の 1 行を遅延トークン列へ変換する字句解析器
// 意図: 呼び出し行の語彙 (識別子・整数・文字列) だけを純粋字句的に切り出す
// 関連ファイル: src/marshal.rs, src/repl/driver.rs, tests/tokenizer.rs
//! 字句解析モジュール
//!
//! - 入力は常に 1 行で、トークンは `next_token` の呼び出しごとに 1 つずつ生成する。
//! - 先読みは 1 トークン分すら行わず、一度消費した列は巻き戻せない。
//!   行ごとに新しい `Tokenizer` を作り直すこと。
//! - 意味的な検証は一切しない。不正な字句は `Invalid` として返し、
//!   扱いは呼び出し側 (マーシャラ) に委ねる。

/// デコード済み文字列リテラルの最大バイト長。
///
/// これを超えるリテラルは `Invalid` となり、行全体が破棄される。
pub const STRING_SCRATCH_CAP: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
/// 字句解析が生成するトークン。値はデコード済みで保持する。
pub enum Token {
    /// 関数名となる識別子 (`[A-Za-z_][A-Za-z0-9_]*`)。
    Identifier(String),
    /// 10 進の符号付き 32bit 整数リテラル。
    IntegerLiteral(i32),
    /// エスケープ解決済みの文字列リテラル。
    StringLiteral(String),
    /// 分類できなかった字句。元の字句を診断用に保持する。
    Invalid(String),
    /// 行末。以降の `next_token` も常にこれを返す。
    EndOfInput,
}

/// 空白文字かどうかを判定するユーティリティ。
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}
/// 10 進数字かどうかを判定するユーティリティ。
fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}
/// 識別子の先頭に使用可能な文字かどうかを判定する。
fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
/// 識別子の後続として許容される文字か判定する。
fn is_ident_rest(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// 1 行分の入力に対する遅延トークナイザ。
pub struct Tokenizer<'a> {
    src: &'a str,
    cursor: usize,
    len: usize,
}

impl<'a> Tokenizer<'a> {
    /// 入力行への読み取り専用ビューからトークナイザを構築する。
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            cursor: 0,
            len: src.len(),
        }
    }

    /// 次のトークンを 1 つ生成する。
    pub fn next_token(&mut self) -> Token {
        self.consume_whitespace();
        let Some(ch) = self.peek_char() else {
            return Token::EndOfInput;
        };
        if is_letter(ch) {
            return self.lex_identifier();
        }
        if is_digit(ch) {
            return self.lex_integer();
        }
        if ch == '"' {
            return self.lex_string_literal();
        }
        // 分類不能な 1 文字。残りの走査は呼び出し側の中断判断に任せる。
        self.advance_char();
        Token::Invalid(ch.to_string())
    }

    fn consume_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if is_whitespace(ch) {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn lex_identifier(&mut self) -> Token {
        let start = self.cursor;
        self.advance_char();
        while let Some(ch) = self.peek_char() {
            if is_ident_rest(ch) {
                self.advance_char();
            } else {
                break;
            }
        }
        Token::Identifier(self.src[start..self.cursor].to_string())
    }

    fn lex_integer(&mut self) -> Token {
        let start = self.cursor;
        while let Some(ch) = self.peek_char() {
            if is_digit(ch) {
                self.advance_char();
            } else {
                break;
            }
        }
        let slice = &self.src[start..self.cursor];
        // 桁あふれは数値パースの失敗として現れ、字句ごと無効扱いになる。
        match slice.parse::<i32>() {
            Ok(value) => Token::IntegerLiteral(value),
            Err(_) => Token::Invalid(slice.to_string()),
        }
    }

    fn lex_string_literal(&mut self) -> Token {
        let start = self.cursor;
        self.advance_char(); // 開始ダブルクォート
        let mut decoded = String::new();
        loop {
            let Some(ch) = self.advance_char() else {
                // 行末まで閉じクォートが現れなかった。
                return Token::Invalid(self.src[start..].to_string());
            };
            match ch {
                '"' => break,
                '\\' => {
                    let Some(esc) = self.advance_char() else {
                        return Token::Invalid(self.src[start..].to_string());
                    };
                    let Some(resolved) = resolve_escape(esc) else {
                        return Token::Invalid(self.src[start..self.cursor].to_string());
                    };
                    decoded.push(resolved);
                }
                '\n' => {
                    return Token::Invalid(self.src[start..self.cursor].to_string());
                }
                other => decoded.push(other),
            }
            if decoded.len() > STRING_SCRATCH_CAP {
                return Token::Invalid(self.src[start..self.cursor].to_string());
            }
        }
        Token::StringLiteral(decoded)
    }

    fn peek_char(&self) -> Option<char> {
        if self.cursor >= self.len {
            None
        } else {
            self.src[self.cursor..].chars().next()
        }
    }

    fn advance_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.cursor = (self.cursor + ch.len_utf8()).min(self.len);
        Some(ch)
    }
}

/// バックスラッシュに続く 1 文字をエスケープとして解決する。
/// 未対応のエスケープは `None` を返し、リテラル全体が無効になる。
fn resolve_escape(esc: char) -> Option<char> {
    match esc {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}
