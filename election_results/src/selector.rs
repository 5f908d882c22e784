use std::collections::BTreeSet;

/// A multi-value selection over the values available in a scope.
///
/// `AllOf` expands to every value present in the scope it is resolved against. It is
/// a separate variant and not a reserved value, so a party that happens to be called
/// "Select All" is selected like any other party.
///
/// ```
/// use election_results::Selector;
///
/// let scope = ["BJP", "INC", "CPI(M)"];
/// assert_eq!(Selector::AllOf.resolve(scope).len(), 3);
///
/// let sel = Selector::subset_of(["INC", "AAP"]);
/// assert!(sel.resolve(scope).contains("AAP"));
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub enum Selector {
    #[default]
    AllOf,
    SubsetOf(BTreeSet<String>),
}

impl Selector {
    pub fn subset_of<I, S>(values: I) -> Selector
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector::SubsetOf(values.into_iter().map(|s| s.into()).collect())
    }

    /// The set of values this selector admits within the given scope.
    ///
    /// An explicit subset is returned as given, even for values absent from the scope:
    /// those values simply match no row.
    pub fn resolve<'a, I>(&self, scope: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self {
            Selector::AllOf => scope.into_iter().map(|s| s.to_string()).collect(),
            Selector::SubsetOf(values) => values.clone(),
        }
    }
}
