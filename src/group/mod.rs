/*!
The four combinators of §4.4–§4.7, the "hardest algorithms" this crate
implements (§2 estimates roughly a third of the core here). Each submodule
owns one combinator's `prep`/`apply`/`retract` logic; [`crate::pattern::
Pattern`] just dispatches into them.
*/

pub mod and;
pub mod or;
pub mod repeat;
pub mod seq;

use crate::pattern::Pattern;
use crate::sequence::Sequence;

fn ordinal(n: usize) -> String {
    if (11..=13).contains(&(n % 100)) {
        return format!("{}th", n);
    }
    match n % 10 {
        1 => format!("{}st", n),
        2 => format!("{}nd", n),
        3 => format!("{}rd", n),
        _ => format!("{}th", n),
    }
}

/// Builds the `<parent-kind> pattern [<parent-name>], <ordinal> child
/// [<child-name>]` diagnostic label that §7 item 3 requires for contract
/// violations and wrapped callback failures.
pub(crate) fn child_label<S: Sequence>(
    parent_kind: &str,
    parent_name: Option<&str>,
    index: usize,
    child: &Pattern<S>,
) -> String {
    let parent = match parent_name {
        Some(n) => format!("{} [{}]", parent_kind, n),
        None => format!("{} (unnamed)", parent_kind),
    };
    format!("{}, {} child {}", parent, ordinal(index + 1), child.label())
}

#[cfg(test)]
mod tests {
    use super::ordinal;

    #[test]
    fn ordinal_exempts_the_teens() {
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(111), "111th");
    }

    #[test]
    fn ordinal_restores_st_nd_rd_past_twenty() {
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(22), "22nd");
        assert_eq!(ordinal(23), "23rd");
        assert_eq!(ordinal(24), "24th");
    }

    #[test]
    fn ordinal_ordinary_cases() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
    }
}
