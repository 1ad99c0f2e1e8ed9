//! URLのパスセグメントを読み込み済みテーブル名へ解決する

use std::collections::HashSet;

use crate::domain::catalog;

/// テーブル名リゾルバ
///
/// 読み込み済みテーブル名の集合だけを持つので、同じ入力には常に同じ結果を返す。
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    loaded: HashSet<String>,
}

impl TableResolver {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loaded: names.into_iter().map(Into::into).collect(),
        }
    }

    /// 別名 -> 完全一致 -> TitleCase推測 の順に解決する
    ///
    /// TitleCase推測はヒューリスティックなので、想定外の入力が別のテーブルに
    /// 解決されることがある（例: `region` -> `Region`）。
    pub fn resolve(&self, segment: &str) -> Option<&str> {
        let name = catalog::alias_for(segment).unwrap_or(segment);

        if let Some(found) = self.loaded.get(name) {
            return Some(found.as_str());
        }

        let guess = title_case_guess(name);
        self.loaded.get(&guess).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }
}

/// 先頭と `_`/`-` 直後の英小文字を大文字にし、その区切りを `_` にする
///
/// `products` -> `Products`, `order-details` -> `Order_Details`。
/// 区切りの後が英小文字でない場合は区切りをそのまま残す。
pub fn title_case_guess(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    let mut at_start = true;

    while let Some(c) = chars.next() {
        if at_start && c.is_ascii_lowercase() {
            out.push(c.to_ascii_uppercase());
        } else if c == '_' || c == '-' {
            match chars.peek() {
                Some(next) if next.is_ascii_lowercase() => {
                    out.push('_');
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
        at_start = false;
    }

    out
}
