//! Vietoris-Rips complex construction
//!
//! Edges join the points that are at most `max_edge_length` apart and higher dimensional
//! simplices are the cliques of the resulting graph, expanded up to `max_dimension`.

use super::TopologyError;
use rayon::prelude::*;

type Result<T> = std::result::Result<T, TopologyError>;

/// Euclidean distance
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// A simplex and the filtration value it enters the complex at
#[derive(Debug, Clone, PartialEq)]
pub struct Simplex {
    /// Vertex indices in increasing order
    pub vertices: Vec<usize>,
    /// Length of the longest edge
    pub filtration: f64,
}
impl Simplex {
    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }
}

/// Simplicial complex closed under taking faces
#[derive(Debug, Clone, Default)]
pub struct SimplicialComplex {
    simplices: Vec<Simplex>,
    n_vertices: usize,
    max_dimension: usize,
    max_simplices: Option<usize>,
}
impl SimplicialComplex {
    fn push(&mut self, simplex: Simplex) -> Result<()> {
        match self.max_simplices {
            Some(limit) if self.simplices.len() >= limit => {
                Err(TopologyError::TooManySimplices(limit))
            }
            _ => {
                self.simplices.push(simplex);
                Ok(())
            }
        }
    }
    /// Number of vertices
    pub fn num_vertices(&self) -> usize {
        self.n_vertices
    }
    /// Total number of simplices
    pub fn num_simplices(&self) -> usize {
        self.simplices.len()
    }
    /// Dimension of the largest simplex
    pub fn dimension(&self) -> usize {
        self.simplices
            .iter()
            .map(Simplex::dimension)
            .max()
            .unwrap_or_default()
    }
    /// Dimension the complex has been expanded to
    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }
    pub fn simplices(&self) -> &[Simplex] {
        &self.simplices
    }
    /// Iterator over the simplices of a given dimension
    pub fn skeleton(&self, dimension: usize) -> impl Iterator<Item = &Simplex> + '_ {
        self.simplices
            .iter()
            .filter(move |s| s.dimension() == dimension)
    }
    /// Iterator over the edges
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.skeleton(1).map(|s| (s.vertices[0], s.vertices[1]))
    }
    /// Iterator over the triangles
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.skeleton(2)
            .map(|s| [s.vertices[0], s.vertices[1], s.vertices[2]])
    }
}

/// Vietoris-Rips complex builder
pub struct RipsComplex<'a, P> {
    points: &'a [P],
    max_edge_length: f64,
    max_dimension: usize,
    max_simplices: Option<usize>,
}
impl<'a, P> RipsComplex<'a, P>
where
    P: AsRef<[f64]> + Sync,
{
    /// Creates a builder with no limit on the edge length and simplices up to triangles
    pub fn new(points: &'a [P]) -> Self {
        Self {
            points,
            max_edge_length: f64::INFINITY,
            max_dimension: 2,
            max_simplices: None,
        }
    }
    pub fn max_edge_length(self, max_edge_length: f64) -> Self {
        Self {
            max_edge_length,
            ..self
        }
    }
    /// Largest dimension of the simplices
    pub fn max_dimension(self, max_dimension: usize) -> Self {
        Self {
            max_dimension,
            ..self
        }
    }
    /// Maximum number of simplices, the construction fails beyond
    pub fn max_simplices(self, max_simplices: Option<usize>) -> Self {
        Self {
            max_simplices,
            ..self
        }
    }
    fn distance(&self, i: usize, j: usize) -> f64 {
        euclidean(self.points[i].as_ref(), self.points[j].as_ref())
    }
    /// Returns, for each point, the neighbors with a larger index within the maximum edge length
    fn upper_neighbors(&self) -> Result<Vec<Vec<(usize, f64)>>> {
        let n = self.points.len();
        (0..n)
            .into_par_iter()
            .map(|i| {
                let mut neighbors = vec![];
                for j in i + 1..n {
                    let d = self.distance(i, j);
                    if !d.is_finite() {
                        return Err(TopologyError::NonFiniteDistance(i, j));
                    }
                    if d <= self.max_edge_length {
                        neighbors.push((j, d));
                    }
                }
                Ok(neighbors)
            })
            .collect()
    }
    /// Builds the complex
    pub fn build(&self) -> Result<SimplicialComplex> {
        let n = self.points.len();
        let mut complex = SimplicialComplex {
            simplices: Vec::with_capacity(n),
            n_vertices: n,
            max_dimension: self.max_dimension,
            max_simplices: self.max_simplices,
        };
        for i in 0..n {
            complex.push(Simplex {
                vertices: vec![i],
                filtration: 0f64,
            })?;
        }
        if self.max_dimension == 0 {
            return Ok(complex);
        }

        let upper = self.upper_neighbors()?;
        let upper_ids: Vec<Vec<usize>> = upper
            .iter()
            .map(|neighbors| neighbors.iter().map(|(j, _)| *j).collect())
            .collect();
        for (i, neighbors) in upper.iter().enumerate() {
            for &(j, d_ij) in neighbors {
                let mut clique = vec![i, j];
                complex.push(Simplex {
                    vertices: clique.clone(),
                    filtration: d_ij,
                })?;
                if self.max_dimension > 1 {
                    let candidates = intersect(&upper_ids[i], &upper_ids[j]);
                    self.expand(&mut clique, d_ij, &candidates, &upper_ids, &mut complex)?;
                }
            }
        }
        log::debug!(
            "Rips complex: {} vertices, {} simplices, dimension {}",
            n,
            complex.num_simplices(),
            complex.dimension()
        );
        Ok(complex)
    }
    /// Adds the cliques made of `clique` and any subset of `candidates`
    ///
    /// `candidates` are sorted, larger than any vertex in `clique` and adjacent to all of them
    fn expand(
        &self,
        clique: &mut Vec<usize>,
        filtration: f64,
        candidates: &[usize],
        upper_ids: &[Vec<usize>],
        complex: &mut SimplicialComplex,
    ) -> Result<()> {
        for (k, &v) in candidates.iter().enumerate() {
            let filtration = clique
                .iter()
                .map(|&u| self.distance(u, v))
                .fold(filtration, f64::max);
            clique.push(v);
            complex.push(Simplex {
                vertices: clique.clone(),
                filtration,
            })?;
            if clique.len() <= self.max_dimension {
                let next = intersect(&candidates[k + 1..], &upper_ids[v]);
                self.expand(clique, filtration, &next, upper_ids, complex)?;
            }
            clique.pop();
        }
        Ok(())
    }
}

/// Intersection of 2 sorted lists
fn intersect(a: &[usize], b: &[usize]) -> Vec<usize> {
    let (mut i, mut j) = (0, 0);
    let mut common = vec![];
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                common.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    common
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(complex: &SimplicialComplex, dimension: usize) -> usize {
        complex.skeleton(dimension).count()
    }

    #[test]
    fn triangle() -> Result<()> {
        let points = [[0.0, 0.0], [1.0, 0.0], [0.5, 0.866]];

        let complex = RipsComplex::new(&points).max_edge_length(0.5).build()?;
        assert_eq!(complex.num_simplices(), 3);
        assert_eq!(complex.dimension(), 0);

        let complex = RipsComplex::new(&points).max_edge_length(1.5).build()?;
        assert_eq!(count(&complex, 1), 3);
        assert_eq!(count(&complex, 2), 1);
        let triangle = complex.skeleton(2).next().unwrap();
        assert_eq!(triangle.vertices, vec![0, 1, 2]);
        assert!((triangle.filtration - 1.0).abs() < 1e-3);
        Ok(())
    }

    #[test]
    fn square_has_no_triangle_below_the_diagonal() -> Result<()> {
        let points = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let complex = RipsComplex::new(&points).max_edge_length(1.2).build()?;
        assert_eq!(count(&complex, 1), 4);
        assert_eq!(count(&complex, 2), 0);
        let complex = RipsComplex::new(&points).max_edge_length(1.5).build()?;
        assert_eq!(count(&complex, 1), 6);
        assert_eq!(count(&complex, 2), 4);
        Ok(())
    }

    #[test]
    fn expansion_dimension() -> Result<()> {
        let points = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let complex = RipsComplex::new(&points).max_dimension(1).build()?;
        assert_eq!(complex.dimension(), 1);
        assert_eq!(complex.num_simplices(), 4 + 6);
        let complex = RipsComplex::new(&points).max_dimension(3).build()?;
        assert_eq!(complex.dimension(), 3);
        assert_eq!(complex.num_simplices(), 4 + 6 + 4 + 1);
        assert!(complex
            .simplices()
            .iter()
            .all(|s| s.vertices.windows(2).all(|v| v[0] < v[1])));
        Ok(())
    }

    #[test]
    fn simplex_budget() {
        let points = [[0.0, 0.0], [1.0, 0.0], [0.5, 0.866]];
        assert_eq!(
            RipsComplex::new(&points).max_simplices(Some(5)).build().err(),
            Some(TopologyError::TooManySimplices(5))
        );
    }

    #[test]
    fn non_finite_coordinates() {
        let points = [[0.0, 0.0], [f64::INFINITY, 0.0]];
        assert_eq!(
            RipsComplex::new(&points).build().err(),
            Some(TopologyError::NonFiniteDistance(0, 1))
        );
    }
}
